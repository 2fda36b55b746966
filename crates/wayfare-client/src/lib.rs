//! # wayfare-client: Remote API Access for the Storefront
//!
//! Ports for the three remote collaborators (auth, catalog, bookings) and
//! the two adapters that implement them.
//!
//! ## Modules
//!
//! - [`ports`] - `AuthApi`, `CatalogApi`, `BookingsApi`
//! - [`http`] - reqwest adapter for the real endpoints
//! - [`simulated`] - in-process stand-in with fixed latency
//! - [`config`] - `StorefrontConfig` (TOML file + environment)
//! - [`error`] - `ClientError`
//!
//! ## Picking a backend
//! ```rust,ignore
//! let config = StorefrontConfig::load(None)?;
//! let catalog: Arc<dyn CatalogApi> = match config.api.backend {
//!     BackendKind::Http => Arc::new(HttpBackend::from_settings(&config.api)?),
//!     BackendKind::Simulated => Arc::new(SimulatedBackend::new(config.simulation)),
//! };
//! ```

pub mod config;
mod dto;
pub mod error;
pub mod http;
pub mod ports;
pub mod simulated;

pub use config::{ApiSettings, BackendKind, SimulationSettings, StorefrontConfig};
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use ports::{AuthApi, BookingsApi, CatalogApi};
pub use simulated::SimulatedBackend;
