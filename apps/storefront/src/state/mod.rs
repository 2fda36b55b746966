//! # Storefront State Root
//!
//! The constructed application-state object the view layer holds. It owns
//! the one [`RootState`] tree and is the only path by which that tree or the
//! session storage changes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dispatch Cycle                                       │
//! │                                                                         │
//! │  view ──► storefront.list_offerings()                                   │
//! │               │                                                         │
//! │               ├─► dispatch(ListOfferings{#7, Pending})                  │
//! │               │        │                                                │
//! │               │        ▼                                                │
//! │               │   writer lock ─► RootState::reduce ─► Vec<Effect>       │
//! │               │        │              (pure)              │             │
//! │               │        ▼                                  ▼             │
//! │               │   watch::send_modify          KeyValueStore::apply      │
//! │               │   (subscribers wake)          (token, refreshToken,     │
//! │               │                                tenantId)                │
//! │               ▼                                                         │
//! │          CatalogApi::list_packages().await   ◄── suspension point       │
//! │               │                                                         │
//! │               └─► dispatch(ListOfferings{#7, Fulfilled(Loaded)})        │
//! │                                                                         │
//! │  Transitions and their effects are serialized by the writer lock, so   │
//! │  storage always ends in the state the last transition asked for.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations live in the `auth`, `catalog` and `bookings` submodules as
//! further `impl Storefront` blocks.

mod auth;
mod bookings;
mod catalog;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use wayfare_client::{AuthApi, BookingsApi, CatalogApi};
use wayfare_core::store::{Action, RequestId, RootState};
use wayfare_storage::KeyValueStore;

use crate::error::ApiResult;

/// The three remote collaborators, as trait objects.
#[derive(Clone)]
pub struct Backends {
    pub auth: Arc<dyn AuthApi>,
    pub catalog: Arc<dyn CatalogApi>,
    pub bookings: Arc<dyn BookingsApi>,
}

impl Backends {
    /// Uses one implementation for all three ports.
    pub fn uniform<B>(backend: B) -> Self
    where
        B: AuthApi + CatalogApi + BookingsApi + 'static,
    {
        let shared = Arc::new(backend);
        Backends {
            auth: shared.clone(),
            catalog: shared.clone(),
            bookings: shared,
        }
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}

/// The process-wide store.
pub struct Storefront {
    state: watch::Sender<RootState>,
    writer: Mutex<()>,
    storage: Arc<dyn KeyValueStore>,
    backends: Backends,
    next_request: AtomicU64,
}

impl Storefront {
    /// Builds the store, seeding the auth slice from storage.
    pub async fn open(storage: Arc<dyn KeyValueStore>, backends: Backends) -> ApiResult<Self> {
        let persisted = storage.load_session().await?;
        let initial = RootState::from_persisted(persisted);
        info!(
            authenticated = initial.auth.is_authenticated,
            tenant = initial.auth.tenant_id.as_deref().unwrap_or("-"),
            "Storefront state initialized"
        );

        let (state, _) = watch::channel(initial);
        Ok(Storefront {
            state,
            writer: Mutex::new(()),
            storage,
            backends,
            next_request: AtomicU64::new(1),
        })
    }

    /// The single mutation entry point.
    ///
    /// Runs the pure transition, publishes the new tree, then performs the
    /// storage writes the transition returned. A failed write is logged and
    /// does not undo the transition.
    pub async fn dispatch(&self, action: impl Into<Action>) {
        let _guard = self.writer.lock().await;
        self.reduce_and_persist(action.into()).await;
    }

    /// Dispatches `action` only if `check` accepts the tree it would apply to.
    ///
    /// The check and the transition run under the same writer lock, so no
    /// other dispatch can change the tree in between. A refused check
    /// dispatches nothing.
    pub(crate) async fn dispatch_checked<T, E>(
        &self,
        check: impl FnOnce(&RootState) -> Result<T, E>,
        action: impl Into<Action>,
    ) -> Result<T, E> {
        let _guard = self.writer.lock().await;
        let checked = self.read(check)?;
        self.reduce_and_persist(action.into()).await;
        Ok(checked)
    }

    /// Caller must hold the writer lock.
    async fn reduce_and_persist(&self, action: Action) {
        let name = action.name();
        let mut effects = Vec::new();
        self.state.send_modify(|state| effects = state.reduce(action));
        debug!(action = %name, effects = effects.len(), "Dispatched action");

        for effect in &effects {
            if let Err(e) = self.storage.apply(effect).await {
                warn!(key = %effect.key(), error = %e, "Failed to persist session change");
            }
        }
    }

    /// A copy of the current tree.
    pub fn snapshot(&self) -> RootState {
        self.state.borrow().clone()
    }

    /// A receiver that wakes on every dispatched action.
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.subscribe()
    }

    /// Reads one value out of the tree without cloning the whole of it.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&RootState) -> T) -> T {
        f(&self.state.borrow())
    }

    /// Next id for a catalog read; ids are never reused within a process.
    pub(crate) fn next_request(&self) -> RequestId {
        RequestId(self.next_request.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn backends(&self) -> &Backends {
        &self.backends
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable fakes for the three ports.

    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use wayfare_client::{ClientError, ClientResult};
    use wayfare_core::{
        AuthGrant, Booking, Credentials, Offering, ProfilePatch, Registration, TokenGrant,
    };
    use wayfare_storage::MemoryStore;

    /// Replies are queued per operation; an empty queue is a transport error.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub(crate) logins: StdMutex<VecDeque<ClientResult<AuthGrant>>>,
        pub(crate) refreshes: StdMutex<VecDeque<ClientResult<TokenGrant>>>,
        pub(crate) logouts: StdMutex<VecDeque<ClientResult<()>>>,
        pub(crate) profiles: StdMutex<VecDeque<ClientResult<ProfilePatch>>>,
        pub(crate) lists: StdMutex<VecDeque<ClientResult<Option<Vec<Offering>>>>>,
        pub(crate) details: StdMutex<VecDeque<ClientResult<Option<Offering>>>>,
        pub(crate) bookings: StdMutex<VecDeque<ClientResult<Vec<Booking>>>>,
        pub(crate) calls: StdMutex<Vec<&'static str>>,
    }

    fn next<T>(
        queue: &StdMutex<VecDeque<ClientResult<T>>>,
        calls: &StdMutex<Vec<&'static str>>,
        name: &'static str,
    ) -> ClientResult<T> {
        calls.lock().unwrap().push(name);
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted reply".into())))
    }

    impl FakeBackend {
        pub(crate) fn push<T>(queue: &StdMutex<VecDeque<ClientResult<T>>>, reply: ClientResult<T>) {
            queue.lock().unwrap().push_back(reply);
        }

        pub(crate) fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AuthApi for FakeBackend {
        async fn login(&self, _credentials: &Credentials) -> ClientResult<AuthGrant> {
            next(&self.logins, &self.calls, "login")
        }

        async fn register(&self, _registration: &Registration) -> ClientResult<AuthGrant> {
            next(&self.logins, &self.calls, "register")
        }

        async fn refresh(&self, _refresh_token: &str) -> ClientResult<TokenGrant> {
            next(&self.refreshes, &self.calls, "refresh")
        }

        async fn logout(&self, _refresh_token: &str) -> ClientResult<()> {
            next(&self.logouts, &self.calls, "logout")
        }

        async fn update_profile(
            &self,
            _access_token: &str,
            _patch: &ProfilePatch,
        ) -> ClientResult<ProfilePatch> {
            next(&self.profiles, &self.calls, "update_profile")
        }
    }

    #[async_trait]
    impl CatalogApi for FakeBackend {
        async fn list_packages(&self) -> ClientResult<Option<Vec<Offering>>> {
            next(&self.lists, &self.calls, "list_packages")
        }

        async fn get_package(&self, _id: &str) -> ClientResult<Option<Offering>> {
            next(&self.details, &self.calls, "get_package")
        }

        async fn featured_packages(&self) -> ClientResult<Option<Vec<Offering>>> {
            next(&self.lists, &self.calls, "featured_packages")
        }
    }

    #[async_trait]
    impl BookingsApi for FakeBackend {
        async fn list_bookings(&self, _access_token: &str) -> ClientResult<Vec<Booking>> {
            next(&self.bookings, &self.calls, "list_bookings")
        }
    }

    /// Storefront over a fake backend and an in-memory store.
    pub(crate) async fn storefront_with(
        backend: Arc<FakeBackend>,
        storage: Arc<MemoryStore>,
    ) -> Storefront {
        let backends = Backends {
            auth: backend.clone(),
            catalog: backend.clone(),
            bookings: backend,
        };
        Storefront::open(storage, backends).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use wayfare_core::store::{AuthAction, CatalogAction, StorageKey};
    use wayfare_core::FilterPatch;
    use wayfare_storage::MemoryStore;

    #[tokio::test]
    async fn test_open_seeds_auth_from_storage() {
        let storage = Arc::new(MemoryStore::with_entries([
            ("token", "persisted-access"),
            ("refreshToken", "persisted-refresh"),
            ("tenantId", "acme"),
        ]));
        let store = storefront_with(Arc::new(FakeBackend::default()), storage).await;

        let state = store.snapshot();
        assert!(state.auth.is_authenticated);
        assert_eq!(state.auth.token.as_deref(), Some("persisted-access"));
        assert_eq!(state.auth.tenant_id.as_deref(), Some("acme"));
        assert!(state.auth.user.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_applies_effects() {
        let storage = Arc::new(MemoryStore::new());
        let store = storefront_with(Arc::new(FakeBackend::default()), storage.clone()).await;

        store.dispatch(AuthAction::SetTenant("acme".into())).await;

        assert_eq!(
            storage.get(StorageKey::TenantId.as_str()).await.unwrap(),
            Some("acme".to_string())
        );
        assert_eq!(store.snapshot().auth.tenant_id.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_subscribers_see_each_dispatch() {
        let store = storefront_with(
            Arc::new(FakeBackend::default()),
            Arc::new(MemoryStore::new()),
        )
        .await;
        let mut rx = store.subscribe();

        store
            .dispatch(CatalogAction::SetFilters(FilterPatch {
                category: Some("Beach".into()),
                ..FilterPatch::default()
            }))
            .await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().catalog.filters.category, "Beach");
    }

    #[tokio::test]
    async fn test_dispatch_checked_refusal_leaves_tree_untouched() {
        let store = storefront_with(
            Arc::new(FakeBackend::default()),
            Arc::new(MemoryStore::new()),
        )
        .await;
        let mut rx = store.subscribe();

        let refused: Result<(), &str> = store
            .dispatch_checked(|_| Err("refused"), CatalogAction::ClearFilters)
            .await;
        assert_eq!(refused, Err("refused"));
        assert!(!rx.has_changed().unwrap());

        let seen = store
            .dispatch_checked(
                |s| Ok::<_, ()>(s.auth.tenant_id.clone()),
                AuthAction::SetTenant("acme".into()),
            )
            .await
            .unwrap();
        assert_eq!(seen, None);
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.snapshot().auth.tenant_id.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_request_ids_increase() {
        let store = storefront_with(
            Arc::new(FakeBackend::default()),
            Arc::new(MemoryStore::new()),
        )
        .await;

        let first = store.next_request();
        let second = store.next_request();
        assert!(second.0 > first.0);
    }
}
