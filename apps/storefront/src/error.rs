//! # API Error Type
//!
//! The one error type the view layer sees.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  storefront.sign_in(credentials)                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Validation? ─── ValidationError ─────────────┐                 │  │
//! │  │         │                                     │                 │  │
//! │  │         ▼                                     ▼                 │  │
//! │  │  Remote call ─── ClientError::Status ───── ApiError ──► Err     │  │
//! │  │         │                                     │                 │  │
//! │  │         ▼                                     ▼                 │  │
//! │  │  Session write ─ StorageError (logged) ─ rejected action        │  │
//! │  │                                          sets slice `error`     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "UNAUTHORIZED", "message": "Invalid credentials" }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `message` is exactly the string the rejected action writes into the
//! slice, so an inline message region and a caller see the same text.

use serde::Serialize;
use wayfare_client::ClientError;
use wayfare_core::{CoreError, ValidationError};
use wayfare_storage::StorageError;

/// Error returned from storefront operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Package not found"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for storefront operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed before any request was sent
    ValidationError,

    /// No token, or the endpoint refused the credentials (401/403)
    Unauthorized,

    /// The endpoint could not be reached or timed out
    Network,

    /// The endpoint answered with a failure status or an unreadable body
    Remote,

    /// Session storage failed
    StorageError,

    /// Configuration could not be loaded or is invalid
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Local "no token" failure, raised without a network call.
    pub fn missing_token() -> Self {
        CoreError::MissingToken.into()
    }
}

/// Converts client errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();
        match err {
            ClientError::NotFound(_) => ApiError::not_found(message),
            ClientError::MissingToken => ApiError::new(ErrorCode::Unauthorized, message),
            ClientError::Status { status, .. } if status == 401 || status == 403 => {
                ApiError::new(ErrorCode::Unauthorized, message)
            }
            ClientError::Status { .. } | ClientError::Decode(_) => {
                ApiError::new(ErrorCode::Remote, message)
            }
            ClientError::Transport(_) | ClientError::Timeout(_) => {
                ApiError::new(ErrorCode::Network, message)
            }
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_) => ApiError::new(ErrorCode::ConfigError, message),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingToken => ApiError::new(ErrorCode::Unauthorized, err.to_string()),
            CoreError::OfferingNotFound(_) => ApiError::not_found(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts storage errors to API errors.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        // Log the actual error but return a generic message
        tracing::error!("Session storage failed: {}", err);
        ApiError::new(ErrorCode::StorageError, "Session storage is unavailable")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for storefront operations.
pub type ApiResult<T> = Result<T, ApiError>;
