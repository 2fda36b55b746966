//! # API Ports
//!
//! The three remote collaborators the storefront talks to. Each is an async
//! trait so the store root can hold `Arc<dyn ...>` and tests can swap in
//! fakes.
//!
//! ## Catalog "no data" vs failure
//! Catalog reads return `Ok(None)` when the endpoint answered successfully
//! but without a payload. The storefront treats that exactly like a failure
//! and substitutes seed data; the distinction is kept for logging.

use async_trait::async_trait;

use wayfare_core::{
    AuthGrant, Booking, Credentials, Offering, ProfilePatch, Registration, TokenGrant,
};

use crate::error::ClientResult;

/// Remote authentication endpoint.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/v1/users/auth/login`
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant>;

    /// `POST /api/v1/users/auth/register`
    async fn register(&self, registration: &Registration) -> ClientResult<AuthGrant>;

    /// `POST /api/v1/users/auth/refresh?refreshToken=...`
    async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenGrant>;

    /// `POST /api/v1/users/auth/logout?refreshToken=...`
    async fn logout(&self, refresh_token: &str) -> ClientResult<()>;

    /// `PATCH /api/v1/users/profile` (bearer). Returns the fields the server
    /// accepted.
    async fn update_profile(
        &self,
        access_token: &str,
        patch: &ProfilePatch,
    ) -> ClientResult<ProfilePatch>;
}

/// Remote catalog endpoint.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /api/v1/travel/packages`
    async fn list_packages(&self) -> ClientResult<Option<Vec<Offering>>>;

    /// `GET /api/v1/travel/packages/{id}`
    async fn get_package(&self, id: &str) -> ClientResult<Option<Offering>>;

    /// `GET /api/v1/travel/packages/featured`
    async fn featured_packages(&self) -> ClientResult<Option<Vec<Offering>>>;
}

/// Remote bookings endpoint.
#[async_trait]
pub trait BookingsApi: Send + Sync {
    /// `GET /api/v1/users/bookings` (bearer)
    async fn list_bookings(&self, access_token: &str) -> ClientResult<Vec<Booking>>;
}
