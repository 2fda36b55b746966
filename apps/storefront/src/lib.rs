//! # Wayfare Storefront
//!
//! Composition root for the storefront's client-side state: configuration,
//! logging, session storage, backend selection and the [`Storefront`] store.
//!
//! ## Module Organization
//! ```text
//! wayfare_storefront/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── Storefront: state tree, dispatch, subscriptions
//! │   ├── auth.rs     ◄─── sign in/up/out, refresh, profile, tenant
//! │   ├── catalog.rs  ◄─── list/fetch/featured with seed fallback, filters
//! │   └── bookings.rs ◄─── bookings list and status tab
//! ├── commands/       ◄─── CLI subcommands (JSON on stdout)
//! └── error.rs        ◄─── ApiError for every operation
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wayfare_client::{BackendKind, HttpBackend, SimulatedBackend, StorefrontConfig};
use wayfare_storage::{KeyValueStore, MemoryStore, SqliteStore, StorageConfig};

pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{Backends, Storefront};

use commands::Cli;

/// Loads configuration, builds the store and runs one CLI command.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Storefront Startup                                │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • storefront.toml, then WAYFARE_* env, then CLI flags               │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG, else [logging] filter; written to stderr                │
/// │                                                                         │
/// │  3. Open Session Storage ─────────────────────────────────────────────► │
/// │     • SQLite file in the data dir, or memory when ephemeral             │
/// │                                                                         │
/// │  4. Select Backend ───────────────────────────────────────────────────► │
/// │     • http: reqwest against [api] base_url                              │
/// │     • simulated: fixed latency + seed data                              │
/// │                                                                         │
/// │  5. Open Store, Execute Command ──────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> ApiResult<Value> {
    let mut config = StorefrontConfig::load(cli.config.clone())?;
    if let Some(backend) = cli.backend {
        config.api.backend = backend;
    }
    if cli.ephemeral {
        config.storage.in_memory = true;
    }

    init_tracing(&config.logging.filter);
    info!(backend = %config.api.backend, "Starting Wayfare storefront");

    let storage = open_storage(&config).await?;
    let backends = build_backends(&config)?;
    let store = Storefront::open(storage, backends).await?;

    commands::execute(&store, cli.command).await
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=wayfare=trace` - Show trace for wayfare crates only
/// - Default: `info,wayfare=debug,sqlx=warn`
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Opens the session store the config asks for.
pub async fn open_storage(config: &StorefrontConfig) -> ApiResult<Arc<dyn KeyValueStore>> {
    if config.storage.in_memory {
        info!("Session storage is in memory; nothing will persist");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = config
        .storage_path()
        .ok_or_else(|| ApiError::new(ErrorCode::ConfigError, "Could not determine data directory"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::new(
                ErrorCode::StorageError,
                format!("Could not create {}: {}", parent.display(), e),
            )
        })?;
    }

    let store = SqliteStore::new(StorageConfig::new(path)).await?;
    Ok(Arc::new(store))
}

/// Builds the backend the config asks for.
pub fn build_backends(config: &StorefrontConfig) -> ApiResult<Backends> {
    match config.api.backend {
        BackendKind::Http => {
            let backend = HttpBackend::from_settings(&config.api)?;
            info!(base_url = %backend.base_url(), "Using HTTP backend");
            Ok(Backends::uniform(backend))
        }
        BackendKind::Simulated => {
            info!("Using simulated backend");
            Ok(Backends::uniform(SimulatedBackend::new(
                config.simulation.clone(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn ephemeral_config() -> StorefrontConfig {
        let mut config = StorefrontConfig::default();
        config.storage.in_memory = true;
        config.simulation = wayfare_client::SimulationSettings::instant();
        config
    }

    async fn simulated_store() -> Storefront {
        let config = ephemeral_config();
        let storage = open_storage(&config).await.unwrap();
        Storefront::open(storage, build_backends(&config).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_simulated_session_flow() {
        let store = simulated_store().await;

        let login = Cli::try_parse_from(["storefront", "login", "jdoe", "--password", "secret1"])
            .unwrap();
        let out = commands::execute(&store, login.command).await.unwrap();
        assert_eq!(out["session"]["authenticated"], true);
        assert_eq!(out["session"]["tenantId"], "default");
        assert_eq!(out["displayName"], "John Doe");

        let bookings = Cli::try_parse_from(["storefront", "bookings", "--status", "confirmed"])
            .unwrap();
        let out = commands::execute(&store, bookings.command).await.unwrap();
        assert_eq!(out["tab"], "confirmed");
        assert_eq!(out["counts"]["all"], 3);

        let logout = Cli::try_parse_from(["storefront", "logout"]).unwrap();
        let out = commands::execute(&store, logout.command).await.unwrap();
        assert_eq!(out["remoteError"], Value::Null);
        assert_eq!(commands::auth::whoami(&store)["authenticated"], false);
    }

    #[tokio::test]
    async fn test_packages_command_applies_filters() {
        let store = simulated_store().await;
        let cli = Cli::try_parse_from([
            "storefront",
            "packages",
            "--category",
            "Adventure",
            "--max-price",
            "1000",
        ])
        .unwrap();

        let out = commands::execute(&store, cli.command).await.unwrap();

        assert_eq!(out["source"], "live");
        assert_eq!(out["filtered"], true);
        assert_eq!(out["filters"]["category"], "Adventure");
        assert_eq!(out["count"], 1);
        assert_eq!(out["packages"][0]["title"], "Mountain Adventure");
    }

    #[tokio::test]
    async fn test_packages_rejects_oversized_price() {
        let store = simulated_store().await;
        let cli = Cli::try_parse_from([
            "storefront",
            "packages",
            "--max-price",
            "100000000000000000",
        ])
        .unwrap();

        let err = commands::execute(&store, cli.command).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.snapshot().catalog.filters, wayfare_core::Filter::default());
    }

    #[tokio::test]
    async fn test_unknown_package_is_not_found() {
        let store = simulated_store().await;
        let cli = Cli::try_parse_from(["storefront", "package", "999"]).unwrap();

        let err = commands::execute(&store, cli.command).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_sqlite_storage_persists_session() {
        let dir = std::env::temp_dir().join(format!("wayfare-run-{}", std::process::id()));
        let mut config = ephemeral_config();
        config.storage.in_memory = false;
        config.storage.path = Some(dir.join("storefront.db"));

        {
            let storage = open_storage(&config).await.unwrap();
            let store = Storefront::open(storage, build_backends(&config).unwrap())
                .await
                .unwrap();
            store.set_tenant("acme").await;
        }

        let storage = open_storage(&config).await.unwrap();
        let store = Storefront::open(storage, build_backends(&config).unwrap())
            .await
            .unwrap();
        assert_eq!(store.snapshot().auth.tenant_id.as_deref(), Some("acme"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
