//! Storage effects emitted by reducers.
//!
//! Reducers never touch storage. They return these values and the store
//! root applies them to the key-value port after the state has changed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The persisted keys owned by the auth container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    #[serde(rename = "token")]
    Token,
    #[serde(rename = "refreshToken")]
    RefreshToken,
    #[serde(rename = "tenantId")]
    TenantId,
}

impl StorageKey {
    /// Every key, in the order they are read at startup.
    pub const ALL: [StorageKey; 3] = [StorageKey::Token, StorageKey::RefreshToken, StorageKey::TenantId];

    /// The storage key string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::RefreshToken => "refreshToken",
            StorageKey::TenantId => "tenantId",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A write to persistent storage that follows a state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StorageEffect {
    Put { key: StorageKey, value: String },
    Remove { key: StorageKey },
}

impl StorageEffect {
    pub fn put(key: StorageKey, value: impl Into<String>) -> Self {
        StorageEffect::Put {
            key,
            value: value.into(),
        }
    }

    pub fn remove(key: StorageKey) -> Self {
        StorageEffect::Remove { key }
    }

    /// Removes every auth key.
    pub fn clear_session() -> Vec<StorageEffect> {
        StorageKey::ALL.into_iter().map(StorageEffect::remove).collect()
    }

    pub fn key(&self) -> StorageKey {
        match self {
            StorageEffect::Put { key, .. } | StorageEffect::Remove { key } => *key,
        }
    }
}
