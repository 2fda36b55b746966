//! The key-value storage port.

use async_trait::async_trait;
use tracing::debug;

use wayfare_core::store::{StorageEffect, StorageKey};
use wayfare_core::PersistedSession;

use crate::error::StorageResult;

/// String-keyed persistent storage.
///
/// Implementations must be safe to share across tasks; the storefront holds
/// one behind an `Arc<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Inserts or overwrites `key`.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Performs one reducer-emitted write.
    async fn apply(&self, effect: &StorageEffect) -> StorageResult<()> {
        debug!(key = %effect.key(), "Applying storage effect");
        match effect {
            StorageEffect::Put { key, value } => self.set(key.as_str(), value).await,
            StorageEffect::Remove { key } => self.remove(key.as_str()).await,
        }
    }

    /// Reads the three session keys used to seed the initial state.
    async fn load_session(&self) -> StorageResult<PersistedSession> {
        Ok(PersistedSession {
            token: self.get(StorageKey::Token.as_str()).await?,
            refresh_token: self.get(StorageKey::RefreshToken.as_str()).await?,
            tenant_id: self.get(StorageKey::TenantId.as_str()).await?,
        })
    }
}
