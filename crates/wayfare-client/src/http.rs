//! # HTTP Backend
//!
//! Reqwest-backed adapter for the auth, catalog and bookings endpoints.
//!
//! This adapter owns transport details only: request shape, headers,
//! timeout and status mapping, and JSON decoding into domain records. Seed
//! fallback and state updates happen in the storefront.
//!
//! ## Request Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login      POST  api/v1/users/auth/login     X-Tenant-ID, JSON body   │
//! │  register   POST  api/v1/users/auth/register  X-Tenant-ID, JSON body   │
//! │  refresh    POST  api/v1/users/auth/refresh?refreshToken=..            │
//! │  logout     POST  api/v1/users/auth/logout?refreshToken=..             │
//! │  profile    PATCH api/v1/users/profile        Bearer, JSON body        │
//! │  packages   GET   api/v1/travel/packages                               │
//! │  package    GET   api/v1/travel/packages/{id}                          │
//! │  featured   GET   api/v1/travel/packages/featured                      │
//! │  bookings   GET   api/v1/users/bookings       Bearer                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use wayfare_core::{
    AuthGrant, Booking, Credentials, Offering, ProfilePatch, Registration, TokenGrant,
    DEFAULT_TENANT_ID,
};

use crate::config::ApiSettings;
use crate::dto::{
    AuthResponseDto, BookingsDto, ErrorBodyDto, PackageDto, PackagesDto, ProfileResponseDto,
};
use crate::error::{ClientError, ClientResult};
use crate::ports::{AuthApi, BookingsApi, CatalogApi};

/// Header carrying the tenant on login and register.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Remote API adapter over one base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Builds an adapter with an explicit request timeout.
    ///
    /// A base URL with a path prefix (`https://gw.example.com/travel`) keeps
    /// the prefix; endpoint paths are joined beneath it.
    pub fn new(base_url: Url, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(HttpBackend { client, base_url })
    }

    /// Builds an adapter from the `[api]` config section.
    pub fn from_settings(settings: &ApiSettings) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        Self::new(base_url, Duration::from_secs(settings.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Sends a request and decodes a 2xx JSON body into `T`.
    ///
    /// `fallback` is the message used when a non-2xx body carries none.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> ClientResult<T> {
        let body = self.send(request, fallback).await?;
        serde_json::from_slice(&body).map_err(ClientError::from)
    }

    async fn send(&self, request: RequestBuilder, fallback: &str) -> ClientResult<Vec<u8>> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ClientError::from)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::from)?;
        if !status.is_success() {
            let err = map_status_error(status, &body, fallback);
            debug!(status = status.as_u16(), error = %err, "Endpoint returned an error");
            return Err(err);
        }
        Ok(body.to_vec())
    }
}

// =============================================================================
// AuthApi
// =============================================================================

#[async_trait]
impl AuthApi for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        let tenant = credentials.tenant_id.as_deref().unwrap_or(DEFAULT_TENANT_ID);
        let request = self
            .client
            .post(self.endpoint("api/v1/users/auth/login")?)
            .header(TENANT_HEADER, tenant)
            .json(credentials);

        let dto: AuthResponseDto = self.send_json(request, "Login failed").await?;
        dto.into_grant(tenant, Utc::now()).map_err(ClientError::Decode)
    }

    async fn register(&self, registration: &Registration) -> ClientResult<AuthGrant> {
        let tenant = registration.tenant_id.as_deref().unwrap_or(DEFAULT_TENANT_ID);
        let request = self
            .client
            .post(self.endpoint("api/v1/users/auth/register")?)
            .header(TENANT_HEADER, tenant)
            .json(registration);

        let dto: AuthResponseDto = self.send_json(request, "Registration failed").await?;
        dto.into_grant(tenant, Utc::now()).map_err(ClientError::Decode)
    }

    async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenGrant> {
        let request = self
            .client
            .post(self.endpoint("api/v1/users/auth/refresh")?)
            .query(&[("refreshToken", refresh_token)]);

        let dto: AuthResponseDto = self.send_json(request, "Token refresh failed").await?;
        Ok(dto.into_token_grant(Utc::now()))
    }

    async fn logout(&self, refresh_token: &str) -> ClientResult<()> {
        let request = self
            .client
            .post(self.endpoint("api/v1/users/auth/logout")?)
            .query(&[("refreshToken", refresh_token)]);

        self.send(request, "Logout failed").await?;
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
        let request = self
            .client
            .patch(self.endpoint("api/v1/users/profile")?)
            .bearer_auth(access_token)
            .json(patch);

        let dto: ProfileResponseDto = self.send_json(request, "Profile update failed").await?;
        Ok(dto.user)
    }
}

// =============================================================================
// CatalogApi
// =============================================================================

#[async_trait]
impl CatalogApi for HttpBackend {
    async fn list_packages(&self) -> ClientResult<Option<Vec<Offering>>> {
        let request = self.client.get(self.endpoint("api/v1/travel/packages")?);
        let dto: PackagesDto = self.send_json(request, "Failed to fetch packages").await?;
        dto.into_offerings().map_err(ClientError::Decode)
    }

    async fn get_package(&self, id: &str) -> ClientResult<Option<Offering>> {
        let mut url = self.endpoint("api/v1/travel/packages/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id);

        let request = self.client.get(url);
        let dto: PackageDto = self.send_json(request, "Package not found").await?;
        dto.into_offering().map_err(ClientError::Decode)
    }

    async fn featured_packages(&self) -> ClientResult<Option<Vec<Offering>>> {
        let request = self
            .client
            .get(self.endpoint("api/v1/travel/packages/featured")?);
        let dto: PackagesDto = self
            .send_json(request, "Failed to fetch featured packages")
            .await?;
        dto.into_offerings().map_err(ClientError::Decode)
    }
}

// =============================================================================
// BookingsApi
// =============================================================================

#[async_trait]
impl BookingsApi for HttpBackend {
    async fn list_bookings(&self, access_token: &str) -> ClientResult<Vec<Booking>> {
        if access_token.is_empty() {
            return Err(ClientError::MissingToken);
        }
        let request = self
            .client
            .get(self.endpoint("api/v1/users/bookings")?)
            .bearer_auth(access_token);

        let dto: BookingsDto = self.send_json(request, "Failed to fetch bookings").await?;
        if let Some(total) = dto.total.filter(|t| *t != dto.bookings.len()) {
            warn!(total, received = dto.bookings.len(), "Bookings total does not match payload");
        }
        Ok(dto.bookings)
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

fn map_status_error(status: StatusCode, body: &[u8], fallback: &str) -> ClientError {
    let message = ErrorBodyDto::message_from(body).unwrap_or_else(|| fallback.to_string());
    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ClientError::Timeout(message),
        _ => ClientError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
