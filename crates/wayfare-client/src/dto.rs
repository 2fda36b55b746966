//! DTOs for decoding remote API responses.
//!
//! The HTTP adapter decodes into these transport DTOs first, then maps into
//! domain records in one pass. The server sends `LocalDateTime` values
//! without an offset; they are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use wayfare_core::validation::validate_offering;
use wayfare_core::{AuthGrant, Booking, Money, Offering, ProfilePatch, Session, TokenGrant};

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_TIMEZONE: &str = "UTC";

// =============================================================================
// Errors
// =============================================================================

/// Body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBodyDto {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl ErrorBodyDto {
    /// Extracts a non-blank `message` from raw body bytes, if any.
    pub(crate) fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBodyDto>(body)
            .ok()
            .and_then(|dto| dto.message)
            .filter(|m| !m.trim().is_empty())
    }
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    pub(crate) id: u64,
    pub(crate) username: String,
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) phone_number: Option<String>,
    #[serde(default)]
    pub(crate) profile_picture_url: Option<String>,
    #[serde(default)]
    pub(crate) is_email_verified: Option<bool>,
    #[serde(default)]
    pub(crate) preferred_language: Option<String>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) last_login_at: Option<String>,
    #[serde(default)]
    pub(crate) roles: Vec<String>,
    #[serde(default)]
    pub(crate) created_at: Option<String>,
}

impl UserDto {
    fn into_session(self, received_at: DateTime<Utc>) -> Result<Session, String> {
        let last_login_at = self
            .last_login_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        let created_at = self
            .created_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?
            .unwrap_or(received_at);

        Ok(Session {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: blank_to_none(self.first_name),
            last_name: blank_to_none(self.last_name),
            full_name: blank_to_none(self.full_name),
            phone_number: blank_to_none(self.phone_number),
            profile_picture_url: blank_to_none(self.profile_picture_url),
            is_email_verified: self.is_email_verified.unwrap_or(false),
            preferred_language: self
                .preferred_language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            timezone: self.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            last_login_at,
            roles: self.roles,
            created_at,
        })
    }
}

/// Response of login, register and refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    #[serde(default)]
    pub(crate) expires_in: Option<i64>,
    #[serde(default)]
    pub(crate) user: Option<UserDto>,
    #[serde(default)]
    pub(crate) tenant_id: Option<String>,
}

impl AuthResponseDto {
    /// Maps a login/register response. `requested_tenant` is used when the
    /// server does not echo a tenant.
    pub(crate) fn into_grant(
        self,
        requested_tenant: &str,
        received_at: DateTime<Utc>,
    ) -> Result<AuthGrant, String> {
        let user = self
            .user
            .ok_or_else(|| "auth response is missing `user`".to_string())?
            .into_session(received_at)?;

        Ok(AuthGrant {
            user,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            tenant_id: self
                .tenant_id
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| requested_tenant.to_string()),
            expires_in: self.expires_in,
            issued_at: received_at,
        })
    }

    pub(crate) fn into_token_grant(self, received_at: DateTime<Utc>) -> TokenGrant {
        TokenGrant {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            issued_at: received_at,
        }
    }
}

/// Response of the profile update: `{user}` with the accepted fields.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponseDto {
    #[serde(default)]
    pub(crate) user: ProfilePatch,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OfferingDto {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) destination: String,
    pub(crate) price: Money,
    pub(crate) duration_days: u32,
    pub(crate) max_travelers: u32,
    #[serde(default = "default_active")]
    pub(crate) is_active: bool,
    #[serde(default)]
    pub(crate) image_url: String,
    #[serde(default)]
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) rating: f64,
    #[serde(default)]
    pub(crate) reviews: u32,
}

fn default_active() -> bool {
    true
}

impl OfferingDto {
    fn into_offering(self) -> Result<Offering, String> {
        let offering = Offering {
            id: self.id,
            title: self.title,
            description: self.description,
            destination: self.destination,
            price: self.price,
            duration_days: self.duration_days,
            max_travelers: self.max_travelers,
            is_active: self.is_active,
            image_url: self.image_url,
            category: self.category,
            rating: self.rating,
            reviews: self.reviews,
        };
        validate_offering(&offering)
            .map_err(|err| format!("package {}: {}", offering.id, err))?;
        Ok(offering)
    }
}

/// `{packages: Offering[]}`; `packages` may be absent or null.
#[derive(Debug, Deserialize)]
pub(crate) struct PackagesDto {
    #[serde(default)]
    pub(crate) packages: Option<Vec<OfferingDto>>,
}

impl PackagesDto {
    /// `None` when the server sent no packages at all.
    pub(crate) fn into_offerings(self) -> Result<Option<Vec<Offering>>, String> {
        match self.packages {
            None => Ok(None),
            Some(packages) if packages.is_empty() => Ok(None),
            Some(packages) => packages
                .into_iter()
                .map(OfferingDto::into_offering)
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
        }
    }
}

/// `{package: Offering}`; `package` may be absent or null.
#[derive(Debug, Deserialize)]
pub(crate) struct PackageDto {
    #[serde(default)]
    pub(crate) package: Option<OfferingDto>,
}

impl PackageDto {
    pub(crate) fn into_offering(self) -> Result<Option<Offering>, String> {
        self.package.map(OfferingDto::into_offering).transpose()
    }
}

// =============================================================================
// Bookings
// =============================================================================

/// `{bookings, total, message}`
#[derive(Debug, Deserialize)]
pub(crate) struct BookingsDto {
    #[serde(default)]
    pub(crate) bookings: Vec<Booking>,
    #[serde(default)]
    pub(crate) total: Option<usize>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`) or an offset-less local
/// timestamp (`2024-01-01T00:00:00.123`), the latter read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid timestamp {:?}: {}", raw, err))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T00:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T02:00:00+02:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_auth_response_maps_to_grant() {
        let body = r#"{
            "accessToken": "a", "refreshToken": "r", "tokenType": "Bearer",
            "expiresIn": 3600,
            "user": {
                "id": 7, "username": "jdoe", "email": "jdoe@example.com",
                "firstName": "John", "profilePictureUrl": "",
                "isEmailVerified": true, "roles": ["USER"],
                "createdAt": "2024-01-01T00:00:00.000"
            }
        }"#;
        let received_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let dto: AuthResponseDto = serde_json::from_str(body).unwrap();
        let grant = dto.into_grant("acme", received_at).unwrap();

        assert_eq!(grant.user.id, 7);
        assert_eq!(grant.user.profile_picture_url, None);
        assert_eq!(grant.user.preferred_language, "en");
        assert_eq!(grant.tenant_id, "acme");
        assert_eq!(grant.expires_in, Some(3600));
        assert_eq!(grant.issued_at, received_at);
    }

    #[test]
    fn test_auth_response_without_user_is_rejected() {
        let dto: AuthResponseDto =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert!(dto.into_grant("default", Utc::now()).is_err());
    }

    #[test]
    fn test_packages_without_data() {
        let dto: PackagesDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.into_offerings().unwrap(), None);

        let dto: PackagesDto = serde_json::from_str(r#"{"packages":[]}"#).unwrap();
        assert_eq!(dto.into_offerings().unwrap(), None);

        let dto: PackageDto = serde_json::from_str(r#"{"package":null}"#).unwrap();
        assert_eq!(dto.into_offering().unwrap(), None);
    }

    #[test]
    fn test_invalid_offering_is_a_decode_failure() {
        let body = r#"{"packages":[{"id":"1","title":"X","price":-5,"durationDays":1,"maxTravelers":1}]}"#;
        let dto: PackagesDto = serde_json::from_str(body).unwrap();
        assert!(dto.into_offerings().is_err());
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            ErrorBodyDto::message_from(br#"{"message":"Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(ErrorBodyDto::message_from(br#"{"message":"  "}"#), None);
        assert_eq!(ErrorBodyDto::message_from(b"<html>"), None);
    }
}
