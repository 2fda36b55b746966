//! # Storefront Configuration
//!
//! Where the storefront sends requests, where it keeps the session, and how
//! slow the simulated backend is.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WAYFARE_API_URL=https://api.example.com                            │
//! │     WAYFARE_BACKEND=http                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.wayfare.storefront/ (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     simulated backend, storage in the platform data dir                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "http://localhost:8080"
//! timeout_secs = 10
//! backend = "http"  # http | simulated
//!
//! [storage]
//! path = "/var/lib/wayfare/storefront.db"
//! in_memory = false
//!
//! [simulation]
//! auth_latency_ms = 1000
//! logout_latency_ms = 500
//! list_latency_ms = 1000
//! detail_latency_ms = 500
//!
//! [logging]
//! filter = "info,wayfare=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "wayfare";
const APPLICATION: &str = "storefront";

// =============================================================================
// Backend Kind
// =============================================================================

/// Which implementation of the API ports the storefront wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Real endpoints over HTTP.
    Http,

    /// In-process stand-in with fixed latency and seed data.
    #[default]
    Simulated,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Http => write!(f, "http"),
            BackendKind::Simulated => write!(f, "simulated"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "remote" => Ok(BackendKind::Http),
            "simulated" | "mock" | "offline" => Ok(BackendKind::Simulated),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown backend: '{}'. Valid options: http, simulated",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[api]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root of the remote API; endpoint paths are joined beneath it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub backend: BackendKind,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            backend: BackendKind::default(),
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file holding the session keys. Defaults to the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Keep the session in memory only; nothing survives the process.
    #[serde(default)]
    pub in_memory: bool,
}

/// `[simulation]`
///
/// Latencies applied by the simulated backend, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Login, register, token refresh and profile update.
    #[serde(default = "default_auth_latency")]
    pub auth_latency_ms: u64,

    #[serde(default = "default_logout_latency")]
    pub logout_latency_ms: u64,

    /// Package list, featured list and bookings list.
    #[serde(default = "default_list_latency")]
    pub list_latency_ms: u64,

    /// Single package lookup.
    #[serde(default = "default_detail_latency")]
    pub detail_latency_ms: u64,
}

fn default_auth_latency() -> u64 {
    1000
}

fn default_logout_latency() -> u64 {
    500
}

fn default_list_latency() -> u64 {
    1000
}

fn default_detail_latency() -> u64 {
    500
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            auth_latency_ms: default_auth_latency(),
            logout_latency_ms: default_logout_latency(),
            list_latency_ms: default_list_latency(),
            detail_latency_ms: default_detail_latency(),
        }
    }
}

impl SimulationSettings {
    /// No artificial delay anywhere.
    pub fn instant() -> Self {
        SimulationSettings {
            auth_latency_ms: 0,
            logout_latency_ms: 0,
            list_latency_ms: 0,
            detail_latency_ms: 0,
        }
    }

    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }

    pub fn logout_latency(&self) -> Duration {
        Duration::from_millis(self.logout_latency_ms)
    }

    pub fn list_latency(&self) -> Duration {
        Duration::from_millis(self.list_latency_ms)
    }

    pub fn detail_latency(&self) -> Duration {
        Duration::from_millis(self.detail_latency_ms)
    }
}

/// `[logging]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,wayfare=debug,sqlx=warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Storefront Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from config file (if exists)
    /// 3. Apply `WAYFARE_*` environment overrides
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        info!(
            backend = %config.api.backend,
            base_url = %config.api.base_url,
            in_memory = config.storage.in_memory,
            "Storefront configuration loaded"
        );

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Saved storefront config");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.api.base_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be at least 1".into(),
            ));
        }

        if !self.storage.in_memory {
            if let Some(path) = &self.storage.path {
                if path.as_os_str().is_empty() {
                    return Err(ClientError::InvalidConfig("storage path is empty".into()));
                }
            }
        }

        Ok(())
    }

    /// Applies `WAYFARE_*` overrides read through `lookup`.
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("WAYFARE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(backend) = lookup("WAYFARE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %parsed, "Overriding backend from environment");
                    self.api.backend = parsed;
                }
                Err(e) => warn!(backend = %backend, error = %e, "Ignoring backend override"),
            }
        }

        if let Some(timeout) = lookup("WAYFARE_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                self.api.timeout_secs = secs;
            }
        }

        if let Some(path) = lookup("WAYFARE_STORAGE_PATH") {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("WAYFARE_STORAGE_IN_MEMORY") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.storage.in_memory = true,
                "0" | "false" | "no" => self.storage.in_memory = false,
                _ => warn!(value = %flag, "Unknown WAYFARE_STORAGE_IN_MEMORY value"),
            }
        }

        if let Some(filter) = lookup("WAYFARE_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// Returns the default session database path.
    pub fn default_storage_path() -> Option<PathBuf> {
        directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.data_dir().join("storefront.db"))
    }

    /// Configured storage path, or the platform default.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(Self::default_storage_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
