//! Catalog container operations.
//!
//! ## Fallback policy
//! Catalog reads never hard-fail because the backend is down or empty:
//! - a transport or endpoint failure, or a success without data, is
//!   answered from the seed catalog and tagged [`CatalogSource::Seed`];
//! - only a lookup by id that misses in both places is rejected.
//!
//! Each read takes a fresh [`RequestId`]; the reducer drops completions of
//! a request that has since been superseded by one of the same kind.

use tracing::{debug, warn};

use wayfare_client::ClientResult;
use wayfare_core::store::{AsyncPhase, CatalogAction};
use wayfare_core::{seed, CatalogSource, Filter, FilterPatch, Loaded, Offering};

use super::Storefront;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Package not found";

impl Storefront {
    /// Loads the full catalog, falling back to the seed list.
    pub async fn list_offerings(&self) -> Loaded<Vec<Offering>> {
        let request = self.next_request();
        self.dispatch(CatalogAction::ListOfferings {
            request,
            phase: AsyncPhase::Pending,
        })
        .await;

        let result = self.backends().catalog.list_packages().await;
        let loaded = live_or_seed("list_packages", result, seed::offerings);

        self.dispatch(CatalogAction::ListOfferings {
            request,
            phase: AsyncPhase::Fulfilled(loaded.clone()),
        })
        .await;
        loaded
    }

    /// Loads the featured list, falling back to the top-rated seed offerings.
    pub async fn list_featured(&self) -> Loaded<Vec<Offering>> {
        let request = self.next_request();
        self.dispatch(CatalogAction::ListFeatured {
            request,
            phase: AsyncPhase::Pending,
        })
        .await;

        let result = self.backends().catalog.featured_packages().await;
        let loaded = live_or_seed("featured_packages", result, seed::featured);

        self.dispatch(CatalogAction::ListFeatured {
            request,
            phase: AsyncPhase::Fulfilled(loaded.clone()),
        })
        .await;
        loaded
    }

    /// Loads one offering into the selected slot.
    ///
    /// A miss everywhere is rejected with "Package not found" and leaves the
    /// selected offering as it was.
    pub async fn fetch_offering_by_id(&self, id: &str) -> ApiResult<Loaded<Offering>> {
        let request = self.next_request();
        self.dispatch(CatalogAction::FetchOffering {
            request,
            phase: AsyncPhase::Pending,
        })
        .await;

        let outcome = match self.backends().catalog.get_package(id).await {
            Ok(Some(offering)) => Ok(Loaded::live(offering)),
            other => {
                match &other {
                    Err(e) => warn!(id, error = %e, "Package lookup failed, searching seed catalog"),
                    Ok(_) => debug!(id, "Package lookup returned no data, searching seed catalog"),
                }
                seed::find_offering(id)
                    .map(Loaded::seed)
                    .ok_or_else(|| ApiError::not_found(NOT_FOUND))
            }
        };

        self.dispatch(CatalogAction::FetchOffering {
            request,
            phase: AsyncPhase::settle(outcome.clone().map_err(|e| e.message)),
        })
        .await;
        outcome
    }

    /// Shallow-merges `patch` into the active filter.
    ///
    /// A merge that would break the price range is refused and the filter
    /// is left unchanged.
    pub async fn set_filters(&self, patch: FilterPatch) -> ApiResult<Filter> {
        let merged = self
            .dispatch_checked(
                |s| s.catalog.filters.merged(&patch),
                CatalogAction::SetFilters(patch.clone()),
            )
            .await?;
        Ok(merged)
    }

    pub async fn clear_filters(&self) {
        self.dispatch(CatalogAction::ClearFilters).await;
    }

    pub async fn set_selected_offering(&self, offering: Option<Offering>) {
        self.dispatch(CatalogAction::SetSelectedOffering(offering))
            .await;
    }

    pub async fn clear_catalog_error(&self) {
        self.dispatch(CatalogAction::ClearError).await;
    }

    /// Loaded offerings that pass the active filter and `search`, in order.
    pub fn visible_offerings(&self, search: &str) -> Vec<Offering> {
        self.read(|s| s.catalog.visible(search).into_iter().cloned().collect())
    }
}

fn live_or_seed(
    operation: &'static str,
    result: ClientResult<Option<Vec<Offering>>>,
    seed_data: fn() -> Vec<Offering>,
) -> Loaded<Vec<Offering>> {
    match result {
        Ok(Some(offerings)) => {
            debug!(operation, count = offerings.len(), source = ?CatalogSource::Live, "Catalog loaded");
            Loaded::live(offerings)
        }
        Ok(None) => {
            warn!(operation, "Backend returned no packages, serving seed catalog");
            Loaded::seed(seed_data())
        }
        Err(e) => {
            warn!(operation, error = %e, "Backend unavailable, serving seed catalog");
            Loaded::seed(seed_data())
        }
    }
}
