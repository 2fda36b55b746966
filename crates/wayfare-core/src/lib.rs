//! # wayfare-core: Pure State Layer for the Wayfare Storefront
//!
//! This crate holds the storefront's client-side state: the domain types,
//! the three state containers (auth, catalog, bookings) and the pure
//! transition functions that move them from one state to the next.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Wayfare Storefront Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View layer (browser / CLI)                   │   │
//! │  │    Catalog ──► Filters ──► Package detail ──► Profile/Bookings  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ dispatch(Action)                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 Storefront (apps/storefront)                    │   │
//! │  │    async operations, effect application, subscriptions          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wayfare-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   store   │  │  filter   │  │ validation│  │   │
//! │  │   │  Session  │  │  reducers │  │ predicate │  │   rules   │  │   │
//! │  │   │  Offering │  │  effects  │  │   seed    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Session, Offering, Booking, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`filter`] - Catalog filter and the match predicate
//! - [`seed`] - Fixture catalog used when the backend is unavailable
//! - [`store`] - State containers, actions and reducers
//! - [`validation`] - Client-side form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use wayfare_core::filter::FilterPatch;
//! use wayfare_core::store::{CatalogAction, RootState};
//!
//! let mut state = RootState::default();
//! state.reduce(
//!     CatalogAction::SetFilters(FilterPatch {
//!         category: Some("Beach".to_string()),
//!         ..FilterPatch::default()
//!     })
//!     .into(),
//! );
//!
//! let catalog = wayfare_core::seed::offerings();
//! let beach = state.catalog.filters.apply(&catalog, "");
//! assert_eq!(beach.len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod money;
pub mod seed;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::{Filter, FilterPatch};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tenant assigned by the auth endpoint when the caller does not name one.
pub const DEFAULT_TENANT_ID: &str = "default";

/// Upper bound of the default price filter, in whole currency units.
///
/// Covers the full price range of the seed catalog.
pub const DEFAULT_MAX_PRICE: i64 = 10_000;

/// Margin before access-token expiry at which a refresh is due (5 minutes).
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// Minimum password length accepted by the sign-in and sign-up forms.
pub const MIN_PASSWORD_LENGTH: usize = 6;
