//! Auth container operations.
//!
//! Every operation brackets its remote call with a `Pending` dispatch and a
//! terminal `Fulfilled`/`Rejected` dispatch, and returns the same outcome
//! to the caller. Local precondition failures (validation, no token) are
//! rejected without a network call.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use wayfare_core::store::{AsyncPhase, AuthAction};
use wayfare_core::validation::{validate_credentials, validate_registration};
use wayfare_core::{Credentials, ProfilePatch, Registration, Session};

use super::Storefront;
use crate::error::{ApiError, ApiResult, ErrorCode};

const NO_SESSION: &str = "No user session loaded; sign in again";

impl Storefront {
    /// Signs in and replaces the session, tokens and tenant.
    ///
    /// Credentials without a tenant are sent with the stored one, if any.
    pub async fn sign_in(&self, mut credentials: Credentials) -> ApiResult<Session> {
        if credentials.tenant_id.is_none() {
            credentials.tenant_id = self.stored_tenant();
        }
        if let Err(e) = validate_credentials(&credentials) {
            return self.reject(AuthAction::SignIn, e.into()).await;
        }

        self.dispatch(AuthAction::SignIn(AsyncPhase::Pending)).await;
        match self.backends().auth.login(&credentials).await {
            Ok(grant) => {
                let user = grant.user.clone();
                info!(user_id = user.id, tenant = %grant.tenant_id, "Signed in");
                self.dispatch(AuthAction::SignIn(AsyncPhase::Fulfilled(grant)))
                    .await;
                Ok(user)
            }
            Err(e) => self.reject(AuthAction::SignIn, e.into()).await,
        }
    }

    /// Registers a new account; same contract as [`Storefront::sign_in`].
    pub async fn sign_up(&self, mut registration: Registration) -> ApiResult<Session> {
        if registration.tenant_id.is_none() {
            registration.tenant_id = self.stored_tenant();
        }
        if let Err(e) = validate_registration(&registration) {
            return self.reject(AuthAction::SignUp, e.into()).await;
        }

        self.dispatch(AuthAction::SignUp(AsyncPhase::Pending)).await;
        match self.backends().auth.register(&registration).await {
            Ok(mut grant) => {
                // a fresh account is unverified whatever the endpoint says
                grant.user.is_email_verified = false;
                let user = grant.user.clone();
                info!(user_id = user.id, tenant = %grant.tenant_id, "Signed up");
                self.dispatch(AuthAction::SignUp(AsyncPhase::Fulfilled(grant)))
                    .await;
                Ok(user)
            }
            Err(e) => self.reject(AuthAction::SignUp, e.into()).await,
        }
    }

    /// Rotates the access and refresh tokens.
    ///
    /// Any failure, including a missing refresh token, tears the session
    /// down exactly like a sign-out.
    pub async fn refresh(&self) -> ApiResult<()> {
        self.dispatch(AuthAction::Refresh(AsyncPhase::Pending)).await;

        let Some(refresh_token) = self.read(|s| s.auth.refresh_token.clone()) else {
            warn!("Refresh attempted without a refresh token");
            return self.reject(AuthAction::Refresh, ApiError::missing_token()).await;
        };

        match self.backends().auth.refresh(&refresh_token).await {
            Ok(grant) => {
                self.dispatch(AuthAction::Refresh(AsyncPhase::Fulfilled(grant)))
                    .await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, ending session");
                self.reject(AuthAction::Refresh, e.into()).await
            }
        }
    }

    /// Refreshes when the access token is within the refresh margin of
    /// expiring. Returns whether a refresh was attempted.
    pub async fn refresh_if_due(&self, now: DateTime<Utc>) -> ApiResult<bool> {
        if !self.read(|s| s.auth.needs_refresh(now)) {
            return Ok(false);
        }
        self.refresh().await.map(|()| true)
    }

    /// Ends the session. State and storage are cleared whatever the remote
    /// call returns; its error is still reported to the caller.
    pub async fn sign_out(&self) -> ApiResult<()> {
        self.dispatch(AuthAction::SignOut(AsyncPhase::Pending)).await;

        let refresh_token = self
            .read(|s| s.auth.refresh_token.clone())
            .unwrap_or_default();
        let outcome = self.backends().auth.logout(&refresh_token).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "Remote logout failed; session cleared locally");
        }

        let outcome = outcome.map_err(ApiError::from);
        self.dispatch(AuthAction::SignOut(AsyncPhase::settle(
            outcome.clone().map_err(|e| e.message),
        )))
        .await;
        info!("Signed out");
        outcome
    }

    /// Sends a partial profile and merges the accepted fields into the session.
    pub async fn update_profile(&self, patch: ProfilePatch) -> ApiResult<Session> {
        self.dispatch(AuthAction::UpdateProfile(AsyncPhase::Pending))
            .await;

        let Some(token) = self.read(|s| s.auth.token.clone()) else {
            return self
                .reject(AuthAction::UpdateProfile, ApiError::missing_token())
                .await;
        };
        // tokens restored from storage carry no session to merge into
        if self.read(|s| s.auth.user.is_none()) {
            let error = ApiError::new(ErrorCode::Unauthorized, NO_SESSION);
            return self.reject(AuthAction::UpdateProfile, error).await;
        }

        match self.backends().auth.update_profile(&token, &patch).await {
            Ok(accepted) => {
                self.dispatch(AuthAction::UpdateProfile(AsyncPhase::Fulfilled(accepted)))
                    .await;
                // a sign-out may have landed while the request was in flight
                self.read(|s| s.auth.user.clone())
                    .ok_or_else(|| ApiError::new(ErrorCode::Unauthorized, NO_SESSION))
            }
            Err(e) => self.reject(AuthAction::UpdateProfile, e.into()).await,
        }
    }

    pub async fn clear_auth_error(&self) {
        self.dispatch(AuthAction::ClearError).await;
    }

    /// Sets and persists the tenant used by the next sign-in.
    pub async fn set_tenant(&self, tenant_id: impl Into<String>) {
        self.dispatch(AuthAction::SetTenant(tenant_id.into())).await;
    }

    fn stored_tenant(&self) -> Option<String> {
        self.read(|s| s.auth.tenant_id.clone())
    }

    /// Dispatches the rejected phase for `action` and returns the error.
    async fn reject<T, P>(
        &self,
        action: impl FnOnce(AsyncPhase<P>) -> AuthAction,
        error: ApiError,
    ) -> ApiResult<T> {
        self.dispatch(action(AsyncPhase::Rejected(error.message.clone())))
            .await;
        Err(error)
    }
}
