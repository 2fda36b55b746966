//! # Validation Module
//!
//! Client-side checks run before a request leaves the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: View                                                         │
//! │  └── Inline form hints                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront operation (Rust)                                  │
//! │  ├── THIS MODULE: credentials, registration, filter ranges             │
//! │  └── Rejected input never reaches the network                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── Authoritative checks (duplicate users, bad passwords)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wayfare_core::validation::{validate_email, validate_password};
//!
//! assert!(validate_email("traveler@example.com").is_ok());
//! assert!(validate_password("12345").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{Credentials, Offering, Registration};
use crate::MIN_PASSWORD_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_USERNAME_LENGTH: usize = 50;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain no whitespace
/// - Must look like `local@domain.tld` with every part non-empty
///
/// ## Example
/// ```rust
/// use wayfare_core::validation::validate_email;
///
/// assert!(validate_email("a@b.co").is_ok());
/// assert!(validate_email("a@b").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("Email"));
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let well_formed = email.match_indices('@').any(|(at, _)| {
        let domain = &email[at + 1..];
        at > 0
            && domain
                .match_indices('.')
                .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
    });

    if well_formed {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Validates a password against the minimum length.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("Password"));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "Password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

/// Validates a username for sign-up.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::required("Username"));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Username".to_string(),
            max: MAX_USERNAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates sign-in input: an identifier plus a password.
///
/// The identifier may be a username or an email, so no format check applies.
pub fn validate_credentials(credentials: &Credentials) -> ValidationResult<()> {
    if credentials.username_or_email.trim().is_empty() {
        return Err(ValidationError::required("Username or email"));
    }
    validate_password(&credentials.password)
}

/// Validates sign-up input.
pub fn validate_registration(registration: &Registration) -> ValidationResult<()> {
    validate_username(&registration.username)?;
    validate_email(&registration.email)?;
    validate_password(&registration.password)
}

/// Sanity-checks an offering received from the remote catalog.
///
/// ## Rules
/// - `id` and `title` must be non-empty
/// - `price` must be non-negative
/// - `rating` must lie in `0..=5`
pub fn validate_offering(offering: &Offering) -> ValidationResult<()> {
    if offering.id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    if offering.title.trim().is_empty() {
        return Err(ValidationError::required("title"));
    }

    if offering.price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if !(0.0..=5.0).contains(&offering.rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 0,
            max: 5,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
