//! # Error Types
//!
//! Domain-specific error types for wayfare-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wayfare-core errors (this file)                                       │
//! │  ├── CoreError        - Local precondition failures                    │
//! │  └── ValidationError  - Form / filter input failures                   │
//! │                                                                         │
//! │  wayfare-client errors (separate crate)                                │
//! │  └── ClientError      - Transport / endpoint failures                  │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the view sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → slice `error` string   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Local failures raised without touching the network.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An authenticated-only operation was attempted with no access token.
    #[error("No session token present")]
    MissingToken,

    /// Offering id is absent from both the endpoint and the seed catalog.
    #[error("Package not found")]
    OfferingNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any network call so the view can show the message inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email).
    #[error("Please enter a valid {field}")]
    InvalidFormat { field: String },

    /// A lower bound exceeds its upper bound.
    #[error("{min_field} must not exceed {max_field}")]
    InvertedRange { min_field: String, max_field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required { field: field.into() }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
