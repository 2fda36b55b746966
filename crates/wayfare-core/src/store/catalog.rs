//! # Catalog Container
//!
//! The offering list, the featured strip, the active filter and the
//! selected offering.
//!
//! ## Stale Completions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list #1 pending ──► in_flight.list = #1                               │
//! │  list #2 pending ──► in_flight.list = #2                               │
//! │  list #1 fulfilled ─► #1 != #2, dropped                                │
//! │  list #2 fulfilled ─► applied, in_flight.list cleared                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Each read kind (list, detail, featured) is tracked separately, so a
//! detail fetch never discards a list result. `loading` stays true while any
//! read is outstanding.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{AsyncPhase, RequestId};
use crate::filter::{Filter, FilterPatch};
use crate::types::{CatalogSource, Loaded, Offering};

// =============================================================================
// State
// =============================================================================

/// Latest outstanding request per read kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    pub list: Option<RequestId>,
    pub detail: Option<RequestId>,
    pub featured: Option<RequestId>,
}

impl InFlight {
    pub fn any(&self) -> bool {
        self.list.is_some() || self.detail.is_some() || self.featured.is_some()
    }
}

/// The catalog slice of the state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogState {
    pub packages: Vec<Offering>,
    pub featured: Vec<Offering>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_package: Option<Offering>,
    pub filters: Filter,
    /// Source of the most recent catalog payload; `Seed` means degraded mode.
    pub source: Option<CatalogSource>,
    #[serde(skip)]
    pub in_flight: InFlight,
}

impl CatalogState {
    /// Offerings matching the active filter and a free-text search term.
    pub fn visible(&self, search: &str) -> Vec<&Offering> {
        self.filters.apply(&self.packages, search)
    }

    /// True when the last payload came from the seed catalog.
    pub fn is_degraded(&self) -> bool {
        self.source == Some(CatalogSource::Seed)
    }

    /// Applies one catalog action.
    pub fn reduce(&mut self, action: CatalogAction) {
        match action {
            CatalogAction::ListOfferings { request, phase } => {
                if let Some(loaded) = self.settle(Slot::List, request, phase) {
                    self.source = Some(loaded.source);
                    self.packages = loaded.data;
                }
            }

            CatalogAction::FetchOffering { request, phase } => {
                if let Some(loaded) = self.settle(Slot::Detail, request, phase) {
                    self.source = Some(loaded.source);
                    self.selected_package = Some(loaded.data);
                }
            }

            CatalogAction::ListFeatured { request, phase } => {
                if let Some(loaded) = self.settle(Slot::Featured, request, phase) {
                    self.source = Some(loaded.source);
                    self.featured = loaded.data;
                }
            }

            CatalogAction::SetFilters(patch) => {
                // an invalid merge leaves the filter as it was
                if let Ok(next) = self.filters.merged(&patch) {
                    self.filters = next;
                }
            }

            CatalogAction::ClearFilters => {
                self.filters = Filter::default();
            }

            CatalogAction::SetSelectedOffering(offering) => {
                self.selected_package = offering;
            }

            CatalogAction::ClearError => {
                self.error = None;
            }
        }
    }

    /// Runs the shared lifecycle bookkeeping and yields the payload only for
    /// a current, fulfilled request.
    fn settle<T>(&mut self, slot: Slot, request: RequestId, phase: AsyncPhase<T>) -> Option<T> {
        if let AsyncPhase::Pending = phase {
            *self.slot_mut(slot) = Some(request);
            self.loading = true;
            self.error = None;
            return None;
        }

        if *self.slot_mut(slot) != Some(request) {
            return None;
        }
        *self.slot_mut(slot) = None;
        self.loading = self.in_flight.any();

        match phase {
            AsyncPhase::Fulfilled(payload) => Some(payload),
            AsyncPhase::Rejected(message) => {
                self.error = Some(message);
                None
            }
            AsyncPhase::Pending => None,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<RequestId> {
        match slot {
            Slot::List => &mut self.in_flight.list,
            Slot::Detail => &mut self.in_flight.detail,
            Slot::Featured => &mut self.in_flight.featured,
        }
    }
}

#[derive(Clone, Copy)]
enum Slot {
    List,
    Detail,
    Featured,
}

// =============================================================================
// Actions
// =============================================================================

/// Actions owned by the catalog container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CatalogAction {
    ListOfferings {
        request: RequestId,
        phase: AsyncPhase<Loaded<Vec<Offering>>>,
    },
    FetchOffering {
        request: RequestId,
        phase: AsyncPhase<Loaded<Offering>>,
    },
    ListFeatured {
        request: RequestId,
        phase: AsyncPhase<Loaded<Vec<Offering>>>,
    },
    SetFilters(FilterPatch),
    ClearFilters,
    SetSelectedOffering(Option<Offering>),
    ClearError,
}

impl CatalogAction {
    pub fn name(&self) -> String {
        match self {
            CatalogAction::ListOfferings { phase, .. } => format!("listOfferings/{}", phase.label()),
            CatalogAction::FetchOffering { phase, .. } => format!("fetchOffering/{}", phase.label()),
            CatalogAction::ListFeatured { phase, .. } => format!("listFeatured/{}", phase.label()),
            CatalogAction::SetFilters(_) => "setFilters".to_string(),
            CatalogAction::ClearFilters => "clearFilters".to_string(),
            CatalogAction::SetSelectedOffering(_) => "setSelectedOffering".to_string(),
            CatalogAction::ClearError => "clearError".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::seed;

    fn list(request: u64, phase: AsyncPhase<Loaded<Vec<Offering>>>) -> CatalogAction {
        CatalogAction::ListOfferings {
            request: RequestId(request),
            phase,
        }
    }

    fn fetch(request: u64, phase: AsyncPhase<Loaded<Offering>>) -> CatalogAction {
        CatalogAction::FetchOffering {
            request: RequestId(request),
            phase,
        }
    }

    fn beach() -> FilterPatch {
        FilterPatch {
            category: Some("Beach".to_string()),
            ..FilterPatch::default()
        }
    }

    #[test]
    fn test_list_lifecycle() {
        let mut state = CatalogState::default();

        state.reduce(list(1, AsyncPhase::Pending));
        assert!(state.loading);

        state.reduce(list(1, AsyncPhase::Fulfilled(Loaded::seed(seed::offerings()))));
        assert!(!state.loading);
        assert_eq!(state.packages.len(), 10);
        assert!(state.is_degraded());
    }

    #[test]
    fn test_set_filters_beach_over_seed_catalog() {
        let mut state = CatalogState::default();
        state.reduce(list(1, AsyncPhase::Pending));
        state.reduce(list(1, AsyncPhase::Fulfilled(Loaded::live(seed::offerings()))));

        state.reduce(CatalogAction::SetFilters(beach()));

        let titles: Vec<_> = state.visible("").into_iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["Sunny Beach Paradise", "Island Hopping"]);
    }

    #[test]
    fn test_clear_filters_restores_default_and_is_idempotent() {
        let mut state = CatalogState::default();
        state.reduce(CatalogAction::SetFilters(beach()));
        state.reduce(CatalogAction::SetFilters(FilterPatch {
            destination: Some("Greek Islands".to_string()),
            min_price: Some(Money::from_major(100)),
            max_price: Some(Money::from_major(2_000)),
            duration: Some(8),
            ..FilterPatch::default()
        }));

        state.reduce(CatalogAction::ClearFilters);
        let once = state.clone();
        assert_eq!(once.filters, Filter::default());
        assert_eq!(once.filters.max_price, Money::from_major(10_000));

        state.reduce(CatalogAction::ClearFilters);
        assert_eq!(state, once);
    }

    #[test]
    fn test_invalid_filter_merge_is_ignored() {
        let mut state = CatalogState::default();
        state.reduce(CatalogAction::SetFilters(FilterPatch {
            max_price: Some(Money::from_major(500)),
            ..FilterPatch::default()
        }));
        let before = state.filters.clone();

        state.reduce(CatalogAction::SetFilters(FilterPatch {
            min_price: Some(Money::from_major(900)),
            ..FilterPatch::default()
        }));

        assert_eq!(state.filters, before);
    }

    #[test]
    fn test_fetch_rejected_keeps_selection() {
        let mut state = CatalogState::default();
        let paris = seed::find_offering("3");
        state.reduce(CatalogAction::SetSelectedOffering(paris.clone()));

        state.reduce(fetch(4, AsyncPhase::Pending));
        state.reduce(fetch(4, AsyncPhase::Rejected("Package not found".to_string())));

        assert_eq!(state.selected_package, paris);
        assert_eq!(state.error.as_deref(), Some("Package not found"));
        assert!(!state.loading);
    }

    #[test]
    fn test_stale_list_completion_is_dropped() {
        let mut state = CatalogState::default();
        let live = vec![seed::offerings().remove(6)];

        state.reduce(list(1, AsyncPhase::Pending));
        state.reduce(list(2, AsyncPhase::Pending));

        state.reduce(list(2, AsyncPhase::Fulfilled(Loaded::live(live.clone()))));
        assert!(!state.loading);

        state.reduce(list(1, AsyncPhase::Fulfilled(Loaded::seed(seed::offerings()))));
        assert_eq!(state.packages, live);
        assert_eq!(state.source, Some(CatalogSource::Live));
    }

    #[test]
    fn test_loading_tracks_every_read_kind() {
        let mut state = CatalogState::default();

        state.reduce(list(1, AsyncPhase::Pending));
        state.reduce(fetch(2, AsyncPhase::Pending));
        state.reduce(list(1, AsyncPhase::Fulfilled(Loaded::live(seed::offerings()))));
        assert!(state.loading, "detail fetch still outstanding");

        state.reduce(fetch(2, AsyncPhase::Fulfilled(Loaded::live(seed::offerings().remove(0)))));
        assert!(!state.loading);
        assert_eq!(state.selected_package.map(|o| o.id), Some("1".to_string()));
    }

    #[test]
    fn test_featured_is_separate_from_list() {
        let mut state = CatalogState::default();
        state.reduce(CatalogAction::ListFeatured {
            request: RequestId(1),
            phase: AsyncPhase::Pending,
        });
        state.reduce(CatalogAction::ListFeatured {
            request: RequestId(1),
            phase: AsyncPhase::Fulfilled(Loaded::seed(seed::featured())),
        });

        assert_eq!(state.featured.len(), 3);
        assert!(state.packages.is_empty());
    }

    #[test]
    fn test_in_flight_is_not_serialized() {
        let mut state = CatalogState::default();
        state.reduce(list(1, AsyncPhase::Pending));

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("inFlight").is_none());
        assert_eq!(json["filters"]["maxPrice"], 10000.0);
    }
}
