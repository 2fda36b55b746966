//! # wayfare-storage: Persistent Key-Value Storage
//!
//! The storefront keeps exactly three values across restarts: the access
//! token, the refresh token and the tenant id. This crate defines the port
//! those values travel through and two adapters behind it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Persistence                            │
//! │                                                                         │
//! │  RootState::reduce(action) ──► Vec<StorageEffect>                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 wayfare-storage (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────────┐        ┌────────────────────────────┐ │   │
//! │  │   │  KeyValueStore     │◄───────│  SqliteStore (sqlite.rs)   │ │   │
//! │  │   │  (port.rs)         │        │  kv_entries table          │ │   │
//! │  │   │  get / set / remove│◄───────│  MemoryStore (memory.rs)   │ │   │
//! │  │   │  apply / load      │        │  HashMap behind RwLock     │ │   │
//! │  │   └────────────────────┘        └────────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/wayfare/storefront.db  (or in-memory)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wayfare_storage::{KeyValueStore, SqliteStore, StorageConfig};
//!
//! let store = SqliteStore::new(StorageConfig::new("storefront.db")).await?;
//! let persisted = store.load_session().await?;
//! ```

pub mod error;
pub mod memory;
pub mod port;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use port::KeyValueStore;
pub use sqlite::{SqliteStore, StorageConfig};
