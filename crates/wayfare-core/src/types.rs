//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Session      │   │    Offering     │   │    Booking      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  id (string)    │   │  id (string)    │       │
//! │  │  username       │   │  title          │   │  package id     │       │
//! │  │  email          │   │  price (Money)  │   │  status         │       │
//! │  │  roles          │   │  category       │   │  total (Money)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Transient (never stored in the state tree):                           │
//! │  Credentials, Registration                                             │
//! │                                                                         │
//! │  Payloads of fulfilled actions:                                        │
//! │  AuthGrant, TokenGrant, ProfilePatch, Loaded<T>                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Every type serializes with camelCase names so the same structs travel
//! to the remote API, into the state tree, and out to the view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Session
// =============================================================================

/// The signed-in identity.
///
/// Owned exclusively by the auth container. Created on sign-in or sign-up,
/// mutated only by a successful profile update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    #[ts(type = "number")]
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub is_email_verified: bool,
    pub preferred_language: String,
    pub timezone: String,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Shallow-merges the fields present in `patch`; absent fields are kept.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        fn merge(slot: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }

        merge(&mut self.first_name, &patch.first_name);
        merge(&mut self.last_name, &patch.last_name);
        merge(&mut self.full_name, &patch.full_name);
        merge(&mut self.phone_number, &patch.phone_number);
        merge(&mut self.profile_picture_url, &patch.profile_picture_url);
        if let Some(language) = &patch.preferred_language {
            self.preferred_language = language.clone();
        }
        if let Some(timezone) = &patch.timezone {
            self.timezone = timezone.clone();
        }
    }

    /// Name shown in the navigation bar: full name, then first/last, then username.
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return full.to_string();
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.username.clone()
        } else {
            joined
        }
    }

    /// Checks whether the session carries a role (case-insensitive).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

/// Partial profile fields: the body of a profile update and of its response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl ProfilePatch {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }
}

// =============================================================================
// Credentials & Registration (transient)
// =============================================================================

/// Sign-in form input. Lives only for the duration of a sign-in call.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username_or_email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl Credentials {
    pub fn new(username_or_email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username_or_email: username_or_email.into(),
            password: password.into(),
            tenant_id: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username_or_email", &self.username_or_email)
            .field("password", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Sign-up form input.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Grants (payloads of fulfilled auth actions)
// =============================================================================

/// A successful sign-in or sign-up.
///
/// `issued_at` is stamped by the client when the response arrives so the
/// reducer can compute token expiry without reading the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub user: Session,
    pub access_token: String,
    pub refresh_token: String,
    pub tenant_id: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub issued_at: DateTime<Utc>,
}

/// A successful token refresh: new access + refresh tokens only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub issued_at: DateTime<Utc>,
}

/// Token values read from persistent storage at process start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub tenant_id: Option<String>,
}

// =============================================================================
// Offering
// =============================================================================

/// One bookable travel package.
///
/// Immutable once loaded for the duration of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Offering {
    pub id: String,
    pub title: String,
    pub description: String,
    pub destination: String,
    /// Non-negative price per traveler.
    #[ts(type = "number")]
    pub price: Money,
    pub duration_days: u32,
    pub max_travelers: u32,
    pub is_active: bool,
    pub image_url: String,
    pub category: String,
    /// Average rating, 0 to 5.
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub reviews: u32,
}

/// Where a catalog payload came from.
///
/// `Seed` means the backend was unreachable (or answered without data) and
/// the fixture catalog was substituted: the storefront is in degraded mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CatalogSource {
    Live,
    Seed,
}

/// A catalog payload tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loaded<T> {
    pub data: T,
    pub source: CatalogSource,
}

impl<T> Loaded<T> {
    pub fn live(data: T) -> Self {
        Loaded {
            data,
            source: CatalogSource::Live,
        }
    }

    pub fn seed(data: T) -> Self {
        Loaded {
            data,
            source: CatalogSource::Seed,
        }
    }

    /// Returns true when the payload is fixture data.
    pub fn is_degraded(&self) -> bool {
        self.source == CatalogSource::Seed
    }
}

// =============================================================================
// Booking
// =============================================================================

/// Status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "CONFIRMED"),
            BookingStatus::Pending => write!(f, "PENDING"),
            BookingStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A reservation of an offering by the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub travel_package_id: String,
    pub travel_package_title: String,
    pub travel_package_image: String,
    pub destination: String,
    #[ts(as = "String")]
    pub booking_date: NaiveDate,
    pub travelers_count: u32,
    #[ts(type = "number")]
    pub total_price: Money,
    pub status: BookingStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> Session {
        Session {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            full_name: None,
            phone_number: Some("+1234567890".to_string()),
            profile_picture_url: None,
            is_email_verified: true,
            preferred_language: "en".to_string(),
            timezone: "UTC".to_string(),
            last_login_at: None,
            roles: vec!["USER".to_string()],
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut s = session();
        let before = s.clone();
        s.apply(&ProfilePatch {
            first_name: Some("A".to_string()),
            ..ProfilePatch::default()
        });

        assert_eq!(s.first_name.as_deref(), Some("A"));
        assert_eq!(s.last_name, before.last_name);
        assert_eq!(s.phone_number, before.phone_number);
        assert_eq!(s.email, before.email);
        assert_eq!(s.created_at, before.created_at);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut s = session();
        assert_eq!(s.display_name(), "John Doe");

        s.full_name = Some("Johnny D".to_string());
        assert_eq!(s.display_name(), "Johnny D");

        s.full_name = None;
        s.first_name = None;
        s.last_name = None;
        assert_eq!(s.display_name(), "jdoe");
        assert!(s.has_role("user"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("jdoe", "hunter22").with_tenant("acme");
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("acme"));

        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["usernameOrEmail"], "jdoe");
        assert_eq!(json["tenantId"], "acme");
    }

    #[test]
    fn test_session_wire_names() {
        let json = serde_json::to_value(session()).unwrap();
        assert_eq!(json["isEmailVerified"], true);
        assert_eq!(json["preferredLanguage"], "en");
        assert!(json.get("firstName").is_some());
    }

    #[test]
    fn test_booking_status_wire_format() {
        let status: BookingStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, BookingStatus::Cancelled);
        assert_eq!(BookingStatus::Pending.to_string(), "PENDING");
    }

    #[test]
    fn test_empty_patch() {
        assert!(ProfilePatch::default().is_empty());
        let patch: ProfilePatch = serde_json::from_str(r#"{"firstName":"A"}"#).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"firstName":"A"}"#);
    }
}
