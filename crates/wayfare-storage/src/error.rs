//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error ──► StorageError ──► ApiError (storefront) or a warn! log │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A failed effect write is logged and never rolls back the state tree.

use thiserror::Error;

/// Key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database could not be opened or created.
    ///
    /// ## When This Occurs
    /// - Parent directory missing or not writable
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema creation failed.
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StorageError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StorageError::PoolExhausted
/// sqlx::Error::PoolClosed     → StorageError::ConnectionFailed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::PoolClosed => StorageError::ConnectionFailed("Pool is closed".to_string()),
            _ => StorageError::Internal(err.to_string()),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
