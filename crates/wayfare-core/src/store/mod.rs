//! # Store
//!
//! The state tree and its transition functions.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         One Dispatch                                    │
//! │                                                                         │
//! │   Action ──► RootState::reduce ──► owning slice reducer                │
//! │                     │                      │                            │
//! │                     │                      ├── next slice state         │
//! │                     │                      └── Vec<StorageEffect>       │
//! │                     ▼                                                   │
//! │   caller applies effects to the key-value port, then publishes         │
//! │   the new tree to subscribers                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Async Lifecycle
//! Every async operation is reported as three actions carrying an
//! [`AsyncPhase`]:
//!
//! | Phase       | loading | error       | payload       |
//! |-------------|---------|-------------|---------------|
//! | `Pending`   | true    | cleared     | -             |
//! | `Fulfilled` | false   | unchanged   | applied       |
//! | `Rejected`  | false   | set         | state kept    |
//!
//! Sign-out and a failed refresh are the exceptions: both tear the session
//! down and leave no error behind.

mod auth;
mod bookings;
mod catalog;
mod effect;

pub use auth::{AuthAction, AuthState};
pub use bookings::{BookingsAction, BookingsState, StatusTab};
pub use catalog::{CatalogAction, CatalogState, InFlight};
pub use effect::{StorageEffect, StorageKey};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::PersistedSession;

// =============================================================================
// Async Phase
// =============================================================================

/// The stage an async operation has reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "payload", rename_all = "snake_case")]
pub enum AsyncPhase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> AsyncPhase<T> {
    /// Converts an operation outcome into the matching terminal phase.
    pub fn settle<E: fmt::Display>(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => AsyncPhase::Fulfilled(value),
            Err(err) => AsyncPhase::Rejected(err.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AsyncPhase::Pending => "pending",
            AsyncPhase::Fulfilled(_) => "fulfilled",
            AsyncPhase::Rejected(_) => "rejected",
        }
    }
}

// =============================================================================
// Request Id
// =============================================================================

/// Monotonic id stamped on every catalog read.
///
/// A completion is applied only if its id is still the latest one issued
/// for that operation; older completions are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Root
// =============================================================================

/// Every action the store understands, tagged by owning container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "snake_case")]
pub enum Action {
    Auth(AuthAction),
    Catalog(CatalogAction),
    Bookings(BookingsAction),
}

impl Action {
    /// Action type name in `slice/operation[/phase]` form, for logs.
    pub fn name(&self) -> String {
        match self {
            Action::Auth(action) => format!("auth/{}", action.name()),
            Action::Catalog(action) => format!("catalog/{}", action.name()),
            Action::Bookings(action) => format!("bookings/{}", action.name()),
        }
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<CatalogAction> for Action {
    fn from(action: CatalogAction) -> Self {
        Action::Catalog(action)
    }
}

impl From<BookingsAction> for Action {
    fn from(action: BookingsAction) -> Self {
        Action::Bookings(action)
    }
}

/// The whole state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootState {
    pub auth: AuthState,
    pub catalog: CatalogState,
    pub bookings: BookingsState,
}

impl RootState {
    /// Initial tree seeded from the values found in storage at startup.
    pub fn from_persisted(persisted: PersistedSession) -> Self {
        RootState {
            auth: AuthState::from_persisted(persisted),
            ..RootState::default()
        }
    }

    /// Routes an action to its container and returns the storage effects
    /// the transition produced.
    ///
    /// An auth action that ends the session also empties the bookings slice.
    pub fn reduce(&mut self, action: Action) -> Vec<StorageEffect> {
        match action {
            Action::Auth(action) => {
                let ends_session = action.ends_session();
                let effects = self.auth.reduce(action);
                if ends_session {
                    self.bookings.reduce(BookingsAction::Reset);
                }
                effects
            }
            Action::Catalog(action) => {
                self.catalog.reduce(action);
                Vec::new()
            }
            Action::Bookings(action) => {
                self.bookings.reduce(action);
                Vec::new()
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::types::{AuthGrant, Session};
    use chrono::{TimeZone, Utc};

    fn grant() -> AuthGrant {
        AuthGrant {
            user: Session {
                id: 1,
                username: "jdoe".to_string(),
                email: "jdoe@example.com".to_string(),
                first_name: None,
                last_name: None,
                full_name: None,
                phone_number: None,
                profile_picture_url: None,
                is_email_verified: true,
                preferred_language: "en".to_string(),
                timezone: "UTC".to_string(),
                last_login_at: None,
                roles: vec![],
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            },
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            tenant_id: "default".to_string(),
            expires_in: None,
            issued_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_sign_out_resets_bookings() {
        let mut state = RootState::default();
        state.reduce(AuthAction::SignIn(AsyncPhase::Fulfilled(grant())).into());
        state.reduce(BookingsAction::List(AsyncPhase::Fulfilled(seed::bookings())).into());
        assert_eq!(state.bookings.bookings.len(), 3);

        let effects = state.reduce(AuthAction::SignOut(AsyncPhase::Fulfilled(())).into());

        assert_eq!(effects, StorageEffect::clear_session());
        assert!(state.bookings.bookings.is_empty());
        assert!(!state.auth.is_authenticated);
    }

    #[test]
    fn test_catalog_actions_emit_no_effects() {
        let mut state = RootState::default();
        let effects = state.reduce(CatalogAction::ClearFilters.into());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_action_names() {
        let action: Action = AuthAction::SignIn(AsyncPhase::Pending).into();
        assert_eq!(action.name(), "auth/signIn/pending");

        let action: Action = CatalogAction::ClearFilters.into();
        assert_eq!(action.name(), "catalog/clearFilters");
    }

    #[test]
    fn test_actions_are_serializable() {
        let action: Action = CatalogAction::ListOfferings {
            request: RequestId(7),
            phase: AsyncPhase::Rejected("offline".to_string()),
        }
        .into();

        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_settle() {
        let ok: AsyncPhase<u8> = AsyncPhase::settle(Ok::<u8, String>(1));
        assert_eq!(ok, AsyncPhase::Fulfilled(1));

        let err: AsyncPhase<u8> = AsyncPhase::settle(Err::<u8, _>("boom"));
        assert_eq!(err, AsyncPhase::Rejected("boom".to_string()));
    }
}
