//! Session commands.
//!
//! Tokens are never printed; `whoami` reports only whether they exist.

use clap::Args;
use serde_json::{json, Value};
use tracing::warn;

use wayfare_core::{Credentials, ProfilePatch, Registration};

use crate::error::ApiResult;
use crate::state::Storefront;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username or email
    pub identifier: String,

    #[arg(long)]
    pub password: String,

    /// Tenant to sign in to (sent as X-Tenant-ID)
    #[arg(long)]
    pub tenant: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub tenant: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub timezone: Option<String>,
}

pub async fn login(store: &Storefront, args: LoginArgs) -> ApiResult<Value> {
    let mut credentials = Credentials::new(args.identifier, args.password);
    credentials.tenant_id = args.tenant;

    let user = store.sign_in(credentials).await?;
    Ok(json!({
        "user": user,
        "displayName": user.display_name(),
        "session": session_summary(store),
    }))
}

pub async fn register(store: &Storefront, args: RegisterArgs) -> ApiResult<Value> {
    let registration = Registration {
        username: args.username,
        email: args.email,
        password: args.password,
        first_name: args.first_name,
        last_name: args.last_name,
        phone_number: args.phone,
        tenant_id: args.tenant,
    };

    let user = store.sign_up(registration).await?;
    Ok(json!({
        "user": user,
        "session": session_summary(store),
    }))
}

pub async fn logout(store: &Storefront) -> ApiResult<Value> {
    // the local session is gone either way; report the remote outcome
    let remote_error = match store.sign_out().await {
        Ok(()) => None,
        Err(e) => {
            warn!(error = %e, "Remote logout failed");
            Some(e.message)
        }
    };
    Ok(json!({
        "signedOut": true,
        "remoteError": remote_error,
    }))
}

pub async fn refresh(store: &Storefront) -> ApiResult<Value> {
    store.refresh().await?;
    Ok(json!({
        "refreshed": true,
        "session": session_summary(store),
    }))
}

pub async fn profile(store: &Storefront, args: ProfileArgs) -> ApiResult<Value> {
    let patch = ProfilePatch {
        first_name: args.first_name,
        last_name: args.last_name,
        full_name: None,
        phone_number: args.phone,
        profile_picture_url: None,
        preferred_language: args.language,
        timezone: args.timezone,
    };
    if patch.is_empty() {
        return Err(crate::error::ApiError::validation(
            "At least one profile field is required",
        ));
    }

    let user = store.update_profile(patch).await?;
    Ok(json!({ "user": user }))
}

pub fn whoami(store: &Storefront) -> Value {
    session_summary(store)
}

fn session_summary(store: &Storefront) -> Value {
    let auth = store.snapshot().auth;
    json!({
        "authenticated": auth.is_authenticated,
        "tenantId": auth.tenant_id,
        "hasRefreshToken": auth.refresh_token.is_some(),
        "tokenExpiresAt": auth.token_expires_at,
        "username": auth.user.as_ref().map(|u| u.username.clone()),
    })
}
