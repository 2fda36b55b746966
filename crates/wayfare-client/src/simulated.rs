//! In-process backend that answers every port after a fixed latency.
//!
//! Auth calls always succeed with a mock identity; catalog and bookings
//! calls serve the seed data. Used when no remote API is configured.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::debug;
use uuid::Uuid;

use wayfare_core::{
    seed, AuthGrant, Booking, Credentials, Offering, ProfilePatch, Registration, Session,
    TokenGrant, DEFAULT_TENANT_ID,
};

use crate::config::SimulationSettings;
use crate::error::{ClientError, ClientResult};
use crate::ports::{AuthApi, BookingsApi, CatalogApi};

/// Lifetime reported for simulated access tokens.
pub const SIMULATED_EXPIRES_IN: i64 = 3600;

#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    latency: SimulationSettings,
}

impl SimulatedBackend {
    pub fn new(latency: SimulationSettings) -> Self {
        SimulatedBackend { latency }
    }

    /// A backend that answers immediately.
    pub fn instant() -> Self {
        Self::new(SimulationSettings::instant())
    }

    async fn pause(&self, latency: Duration, operation: &'static str) {
        if !latency.is_zero() {
            debug!(operation, latency_ms = latency.as_millis() as u64, "Simulating latency");
            tokio::time::sleep(latency).await;
        }
    }

    fn issue(user: Session, tenant_id: String) -> AuthGrant {
        AuthGrant {
            user,
            access_token: mock_token("access"),
            refresh_token: mock_token("refresh"),
            tenant_id,
            expires_in: Some(SIMULATED_EXPIRES_IN),
            issued_at: Utc::now(),
        }
    }
}

fn mock_token(kind: &str) -> String {
    format!("mock-{}-token-{}", kind, Uuid::new_v4())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

#[async_trait]
impl AuthApi for SimulatedBackend {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        self.pause(self.latency.auth_latency(), "login").await;

        let now = Utc::now();
        let user = Session {
            id: 1,
            username: credentials.username_or_email.clone(),
            email: credentials.username_or_email.clone(),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            full_name: Some("John Doe".to_string()),
            phone_number: Some("+1234567890".to_string()),
            profile_picture_url: None,
            is_email_verified: true,
            preferred_language: "en".to_string(),
            timezone: "UTC".to_string(),
            last_login_at: Some(now),
            roles: vec!["USER".to_string()],
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(now),
        };
        let tenant = non_empty(&credentials.tenant_id)
            .unwrap_or_else(|| DEFAULT_TENANT_ID.to_string());

        Ok(Self::issue(user, tenant))
    }

    async fn register(&self, registration: &Registration) -> ClientResult<AuthGrant> {
        self.pause(self.latency.auth_latency(), "register").await;

        let now = Utc::now();
        let first = non_empty(&registration.first_name);
        let last = non_empty(&registration.last_name);
        let full = format!(
            "{} {}",
            first.as_deref().unwrap_or(""),
            last.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        let user = Session {
            id: 2,
            username: registration.username.clone(),
            email: registration.email.clone(),
            first_name: first,
            last_name: last,
            full_name: Some(full).filter(|f| !f.is_empty()),
            phone_number: non_empty(&registration.phone_number),
            profile_picture_url: None,
            is_email_verified: false,
            preferred_language: "en".to_string(),
            timezone: "UTC".to_string(),
            last_login_at: Some(now),
            roles: vec!["USER".to_string()],
            created_at: now,
        };
        let tenant = non_empty(&registration.tenant_id)
            .unwrap_or_else(|| DEFAULT_TENANT_ID.to_string());

        Ok(Self::issue(user, tenant))
    }

    async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenGrant> {
        self.pause(self.latency.auth_latency(), "refresh").await;
        if refresh_token.is_empty() {
            return Err(ClientError::Status {
                status: 401,
                message: "Token refresh failed".to_string(),
            });
        }

        Ok(TokenGrant {
            access_token: mock_token("access"),
            refresh_token: mock_token("refresh"),
            expires_in: Some(SIMULATED_EXPIRES_IN),
            issued_at: Utc::now(),
        })
    }

    async fn logout(&self, _refresh_token: &str) -> ClientResult<()> {
        self.pause(self.latency.logout_latency(), "logout").await;
        Ok(())
    }

    async fn update_profile(
        &self,
        access_token: &str,
        patch: &ProfilePatch,
    ) -> ClientResult<ProfilePatch> {
        if access_token.is_empty() {
            return Err(ClientError::MissingToken);
        }
        self.pause(self.latency.auth_latency(), "update_profile").await;
        Ok(patch.clone())
    }
}

#[async_trait]
impl CatalogApi for SimulatedBackend {
    async fn list_packages(&self) -> ClientResult<Option<Vec<Offering>>> {
        self.pause(self.latency.list_latency(), "list_packages").await;
        Ok(Some(seed::offerings()))
    }

    async fn get_package(&self, id: &str) -> ClientResult<Option<Offering>> {
        self.pause(self.latency.detail_latency(), "get_package").await;
        seed::find_offering(id)
            .map(Some)
            .ok_or_else(|| ClientError::NotFound("Package not found".to_string()))
    }

    async fn featured_packages(&self) -> ClientResult<Option<Vec<Offering>>> {
        self.pause(self.latency.list_latency(), "featured_packages").await;
        Ok(Some(seed::featured()))
    }
}

#[async_trait]
impl BookingsApi for SimulatedBackend {
    async fn list_bookings(&self, access_token: &str) -> ClientResult<Vec<Booking>> {
        if access_token.is_empty() {
            return Err(ClientError::MissingToken);
        }
        self.pause(self.latency.list_latency(), "list_bookings").await;
        Ok(seed::bookings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_auth_latency() {
        let backend = SimulatedBackend::default();
        let started = Instant::now();

        let grant = backend
            .login(&Credentials::new("jdoe@example.com", "secret1"))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(grant.user.id, 1);
        assert_eq!(grant.user.email, "jdoe@example.com");
        assert_eq!(grant.tenant_id, "default");
        assert!(grant.access_token.starts_with("mock-access-token-"));
        assert!(grant.refresh_token.starts_with("mock-refresh-token-"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_keeps_requested_tenant() {
        let backend = SimulatedBackend::default();
        let grant = backend
            .login(&Credentials::new("jdoe", "secret1").with_tenant("acme"))
            .await
            .unwrap();
        assert_eq!(grant.tenant_id, "acme");
    }

    #[tokio::test]
    async fn test_register_builds_full_name() {
        let backend = SimulatedBackend::instant();
        let registration = Registration {
            username: "ana".into(),
            email: "ana@example.com".into(),
            password: "secret1".into(),
            first_name: Some("Ana".into()),
            last_name: None,
            phone_number: None,
            tenant_id: None,
        };

        let grant = backend.register(&registration).await.unwrap();
        assert_eq!(grant.user.id, 2);
        assert_eq!(grant.user.full_name.as_deref(), Some("Ana"));
        assert!(!grant.user.is_email_verified);
    }

    #[tokio::test]
    async fn test_refresh_issues_new_tokens() {
        let backend = SimulatedBackend::instant();
        let first = backend.refresh("r1").await.unwrap();
        let second = backend.refresh("r1").await.unwrap();

        assert!(!first.access_token.is_empty());
        assert_ne!(first.access_token, second.access_token);
        assert!(backend.refresh("").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_latency_and_not_found() {
        let backend = SimulatedBackend::default();
        let started = Instant::now();

        let found = backend.get_package("3").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(found.map(|o| o.title), Some("City Break in Paris".to_string()));

        let err = backend.get_package("999").await.unwrap_err();
        assert_eq!(err.to_string(), "Package not found");
    }

    #[tokio::test]
    async fn test_catalog_serves_seed() {
        let backend = SimulatedBackend::instant();
        assert_eq!(backend.list_packages().await.unwrap(), Some(seed::offerings()));
        assert_eq!(backend.featured_packages().await.unwrap(), Some(seed::featured()));
    }

    #[tokio::test]
    async fn test_bookings_require_token() {
        let backend = SimulatedBackend::instant();
        assert!(matches!(
            backend.list_bookings("").await,
            Err(ClientError::MissingToken)
        ));
        assert_eq!(backend.list_bookings("t").await.unwrap().len(), 3);
    }
}
