//! # Auth Container
//!
//! Session, tokens and tenant for the signed-in user.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   from_persisted ──► [anonymous | token only]                          │
//! │                          │                                              │
//! │          signIn / signUp fulfilled  (Put token, refreshToken, tenantId) │
//! │                          ▼                                              │
//! │                    [authenticated] ◄── refresh fulfilled (Put tokens)   │
//! │                          │         ◄── updateProfile fulfilled (merge)  │
//! │                          │                                              │
//! │        signOut (any outcome) / refresh rejected  (Remove all keys)      │
//! │                          ▼                                              │
//! │                     [anonymous]                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `is_authenticated == token.is_some()`, and a stored token is never empty.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::effect::{StorageEffect, StorageKey};
use super::AsyncPhase;
use crate::types::{AuthGrant, PersistedSession, ProfilePatch, Session, TokenGrant};
use crate::REFRESH_MARGIN_SECS;

// =============================================================================
// State
// =============================================================================

/// The auth slice of the state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthState {
    pub user: Option<Session>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub tenant_id: Option<String>,
    #[ts(as = "Option<String>")]
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl AuthState {
    /// Builds the startup state from persisted token values.
    ///
    /// A token alone marks the slice authenticated; the profile arrives with
    /// the next sign-in.
    pub fn from_persisted(persisted: PersistedSession) -> Self {
        let token = non_empty(persisted.token);
        AuthState {
            is_authenticated: token.is_some(),
            token,
            refresh_token: non_empty(persisted.refresh_token),
            tenant_id: non_empty(persisted.tenant_id),
            ..AuthState::default()
        }
    }

    /// Returns true when the access token expires within the refresh margin.
    ///
    /// Tokens without a known expiry never report due.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.token_expires_at) {
            (Some(_), Some(expires_at)) => {
                now + Duration::seconds(REFRESH_MARGIN_SECS) >= expires_at
            }
            _ => false,
        }
    }

    /// Applies one auth action and returns the storage writes it implies.
    pub fn reduce(&mut self, action: AuthAction) -> Vec<StorageEffect> {
        match action {
            AuthAction::SignIn(phase) | AuthAction::SignUp(phase) => match phase {
                AsyncPhase::Pending => {
                    self.begin();
                    Vec::new()
                }
                AsyncPhase::Fulfilled(grant) => self.establish(grant),
                AsyncPhase::Rejected(message) => {
                    self.fail(message);
                    Vec::new()
                }
            },

            AuthAction::Refresh(phase) => match phase {
                AsyncPhase::Pending => {
                    self.begin();
                    Vec::new()
                }
                AsyncPhase::Fulfilled(grant) => self.rotate(grant),
                AsyncPhase::Rejected(_) => self.teardown(),
            },

            AuthAction::SignOut(phase) => match phase {
                AsyncPhase::Pending => {
                    self.begin();
                    Vec::new()
                }
                // the remote outcome does not matter
                AsyncPhase::Fulfilled(()) | AsyncPhase::Rejected(_) => self.teardown(),
            },

            AuthAction::UpdateProfile(phase) => {
                match phase {
                    AsyncPhase::Pending => self.begin(),
                    AsyncPhase::Fulfilled(patch) => {
                        self.is_loading = false;
                        if let Some(user) = self.user.as_mut() {
                            user.apply(&patch);
                        }
                    }
                    AsyncPhase::Rejected(message) => self.fail(message),
                }
                Vec::new()
            }

            AuthAction::ClearError => {
                self.error = None;
                Vec::new()
            }

            AuthAction::SetTenant(tenant_id) => {
                self.tenant_id = Some(tenant_id.clone());
                vec![StorageEffect::put(StorageKey::TenantId, tenant_id)]
            }
        }
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }

    fn establish(&mut self, grant: AuthGrant) -> Vec<StorageEffect> {
        self.is_loading = false;
        self.user = Some(grant.user);
        self.token = non_empty(Some(grant.access_token));
        self.refresh_token = non_empty(Some(grant.refresh_token));
        self.tenant_id = Some(grant.tenant_id);
        self.is_authenticated = self.token.is_some();
        self.token_expires_at = expiry(grant.issued_at, grant.expires_in);

        let mut effects = self.token_effects();
        if let Some(tenant_id) = &self.tenant_id {
            effects.push(StorageEffect::put(StorageKey::TenantId, tenant_id.clone()));
        }
        effects
    }

    fn rotate(&mut self, grant: TokenGrant) -> Vec<StorageEffect> {
        self.is_loading = false;
        self.token = non_empty(Some(grant.access_token));
        self.refresh_token = non_empty(Some(grant.refresh_token));
        self.is_authenticated = self.token.is_some();
        self.token_expires_at = expiry(grant.issued_at, grant.expires_in);
        self.token_effects()
    }

    fn token_effects(&self) -> Vec<StorageEffect> {
        let mut effects = Vec::with_capacity(3);
        match &self.token {
            Some(token) => effects.push(StorageEffect::put(StorageKey::Token, token.clone())),
            None => effects.push(StorageEffect::remove(StorageKey::Token)),
        }
        match &self.refresh_token {
            Some(token) => {
                effects.push(StorageEffect::put(StorageKey::RefreshToken, token.clone()))
            }
            None => effects.push(StorageEffect::remove(StorageKey::RefreshToken)),
        }
        effects
    }

    fn teardown(&mut self) -> Vec<StorageEffect> {
        *self = AuthState::default();
        StorageEffect::clear_session()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn expiry(issued_at: DateTime<Utc>, expires_in: Option<i64>) -> Option<DateTime<Utc>> {
    expires_in
        .filter(|secs| *secs > 0)
        .map(|secs| issued_at + Duration::seconds(secs))
}

// =============================================================================
// Actions
// =============================================================================

/// Actions owned by the auth container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AuthAction {
    SignIn(AsyncPhase<AuthGrant>),
    SignUp(AsyncPhase<AuthGrant>),
    Refresh(AsyncPhase<TokenGrant>),
    SignOut(AsyncPhase<()>),
    UpdateProfile(AsyncPhase<ProfilePatch>),
    ClearError,
    SetTenant(String),
}

impl AuthAction {
    pub fn name(&self) -> String {
        match self {
            AuthAction::SignIn(phase) => format!("signIn/{}", phase.label()),
            AuthAction::SignUp(phase) => format!("signUp/{}", phase.label()),
            AuthAction::Refresh(phase) => format!("refresh/{}", phase.label()),
            AuthAction::SignOut(phase) => format!("signOut/{}", phase.label()),
            AuthAction::UpdateProfile(phase) => format!("updateProfile/{}", phase.label()),
            AuthAction::ClearError => "clearError".to_string(),
            AuthAction::SetTenant(_) => "setTenant".to_string(),
        }
    }

    /// True for the terminal phases that destroy the session.
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            AuthAction::SignOut(AsyncPhase::Fulfilled(_) | AsyncPhase::Rejected(_))
                | AuthAction::Refresh(AsyncPhase::Rejected(_))
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn session() -> Session {
        Session {
            id: 1,
            username: "jdoe@example.com".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            full_name: Some("John Doe".to_string()),
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

    fn grant(access_token: &str) -> AuthGrant {
        AuthGrant {
            user: session(),
            access_token: access_token.to_string(),
            refresh_token: "refresh-1".to_string(),
            tenant_id: "acme".to_string(),
            expires_in: Some(3600),
            issued_at: issued_at(),
        }
    }

    fn signed_in() -> AuthState {
        let mut state = AuthState::default();
        state.reduce(AuthAction::SignIn(AsyncPhase::Fulfilled(grant("access-1"))));
        state
    }

    #[test]
    fn test_sign_in_pending_sets_loading_and_clears_error() {
        let mut state = AuthState {
            error: Some("old".to_string()),
            ..AuthState::default()
        };
        let effects = state.reduce(AuthAction::SignIn(AsyncPhase::Pending));

        assert!(state.is_loading);
        assert!(state.error.is_none());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_sign_in_fulfilled_establishes_session_and_persists() {
        let mut state = AuthState::default();
        state.reduce(AuthAction::SignIn(AsyncPhase::Pending));
        let effects = state.reduce(AuthAction::SignIn(AsyncPhase::Fulfilled(grant("access-1"))));

        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.token.as_deref(), Some("access-1"));
        assert_eq!(state.tenant_id.as_deref(), Some("acme"));
        assert_eq!(state.user.as_ref().map(|u| u.id), Some(1));
        assert_eq!(
            effects,
            vec![
                StorageEffect::put(StorageKey::Token, "access-1"),
                StorageEffect::put(StorageKey::RefreshToken, "refresh-1"),
                StorageEffect::put(StorageKey::TenantId, "acme"),
            ]
        );
    }

    #[test]
    fn test_authenticated_iff_non_empty_token_returned() {
        for (token, expected) in [("access-1", true), ("", false)] {
            let mut state = AuthState::default();
            state.reduce(AuthAction::SignIn(AsyncPhase::Fulfilled(grant(token))));
            assert_eq!(state.is_authenticated, expected, "token {:?}", token);
            assert_eq!(state.token.is_some(), expected);
        }
    }

    #[test]
    fn test_sign_in_rejected_touches_only_error_and_loading() {
        let mut state = signed_in();
        let before = state.clone();

        state.reduce(AuthAction::SignIn(AsyncPhase::Pending));
        let effects = state.reduce(AuthAction::SignIn(AsyncPhase::Rejected(
            "Invalid credentials".to_string(),
        )));

        assert!(effects.is_empty());
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert!(!state.is_loading);
        assert_eq!(
            AuthState {
                error: None,
                ..state
            },
            before
        );
    }

    #[test]
    fn test_sign_out_is_identical_for_both_outcomes() {
        let mut succeeded = signed_in();
        let mut failed = signed_in();

        let ok_effects = succeeded.reduce(AuthAction::SignOut(AsyncPhase::Fulfilled(())));
        let err_effects =
            failed.reduce(AuthAction::SignOut(AsyncPhase::Rejected("offline".to_string())));

        assert_eq!(succeeded, failed);
        assert_eq!(succeeded, AuthState::default());
        assert_eq!(ok_effects, err_effects);
        assert_eq!(ok_effects, StorageEffect::clear_session());
    }

    #[test]
    fn test_refresh_failure_matches_sign_out() {
        let mut refreshed = signed_in();
        let mut signed_out = signed_in();

        let refresh_effects =
            refreshed.reduce(AuthAction::Refresh(AsyncPhase::Rejected("expired".to_string())));
        let sign_out_effects = signed_out.reduce(AuthAction::SignOut(AsyncPhase::Fulfilled(())));

        assert_eq!(refreshed, signed_out);
        assert!(refreshed.user.is_none());
        assert!(refreshed.tenant_id.is_none());
        assert!(!refreshed.is_authenticated);
        assert_eq!(refresh_effects, sign_out_effects);
    }

    #[test]
    fn test_refresh_success_replaces_tokens_only() {
        let mut state = signed_in();
        let user_before = state.user.clone();

        let effects = state.reduce(AuthAction::Refresh(AsyncPhase::Fulfilled(TokenGrant {
            access_token: "access-2".to_string(),
            refresh_token: "refresh-2".to_string(),
            expires_in: None,
            issued_at: issued_at(),
        })));

        assert_eq!(state.token.as_deref(), Some("access-2"));
        assert_eq!(state.refresh_token.as_deref(), Some("refresh-2"));
        assert_eq!(state.user, user_before);
        assert_eq!(state.tenant_id.as_deref(), Some("acme"));
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_update_profile_merges_into_session() {
        let mut state = signed_in();
        let before = state.user.clone().unwrap();

        state.reduce(AuthAction::UpdateProfile(AsyncPhase::Fulfilled(ProfilePatch {
            first_name: Some("A".to_string()),
            ..ProfilePatch::default()
        })));

        let after = state.user.unwrap();
        assert_eq!(after.first_name.as_deref(), Some("A"));
        assert_eq!(
            Session {
                first_name: before.first_name.clone(),
                ..after
            },
            before
        );
    }

    #[test]
    fn test_update_profile_rejected_keeps_session() {
        let mut state = signed_in();
        let before = state.user.clone();

        state.reduce(AuthAction::UpdateProfile(AsyncPhase::Rejected(
            "No session token present".to_string(),
        )));

        assert_eq!(state.user, before);
        assert_eq!(state.error.as_deref(), Some("No session token present"));
    }

    #[test]
    fn test_set_tenant_persists() {
        let mut state = AuthState::default();
        let effects = state.reduce(AuthAction::SetTenant("acme".to_string()));

        assert_eq!(state.tenant_id.as_deref(), Some("acme"));
        assert_eq!(effects, vec![StorageEffect::put(StorageKey::TenantId, "acme")]);
    }

    #[test]
    fn test_from_persisted() {
        let state = AuthState::from_persisted(PersistedSession {
            token: Some("stored".to_string()),
            refresh_token: Some("".to_string()),
            tenant_id: Some("acme".to_string()),
        });
        assert!(state.is_authenticated);
        assert!(state.refresh_token.is_none());
        assert!(state.user.is_none());

        let state = AuthState::from_persisted(PersistedSession::default());
        assert!(!state.is_authenticated);
    }

    #[test]
    fn test_needs_refresh_uses_margin() {
        let state = signed_in();
        let expires_at = issued_at() + Duration::seconds(3600);

        assert!(!state.needs_refresh(issued_at()));
        assert!(!state.needs_refresh(expires_at - Duration::seconds(301)));
        assert!(state.needs_refresh(expires_at - Duration::seconds(300)));
        assert!(!AuthState::default().needs_refresh(expires_at));
    }
}
