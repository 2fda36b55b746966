//! # Catalog Filter
//!
//! The persisted narrowing criteria for the catalog and the predicate views
//! use to decide which offerings to show.
//!
//! ## Match Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  offering matches  ⇔                                                   │
//! │      search term ⊂ title OR destination   (case-insensitive)           │
//! │  AND destination filter empty  OR  == offering.destination             │
//! │  AND min_price <= offering.price <= max_price                          │
//! │  AND duration filter == 0 (any) OR  == offering.duration_days          │
//! │  AND category filter empty     OR  == offering.category                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The free-text search term is UI-local and never stored in [`Filter`].
//! Matches keep the catalog's original order; there is no ranking.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::seed::CATEGORIES;
use crate::types::Offering;
use crate::DEFAULT_MAX_PRICE;

/// Duration sentinel meaning "any length".
pub const ANY_DURATION: u32 = 0;

/// Active catalog filter.
///
/// ## Invariant
/// `min_price <= max_price`. The storefront validates every merge with
/// [`Filter::merged`] before dispatching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Filter {
    pub destination: String,
    #[ts(type = "number")]
    pub min_price: Money,
    #[ts(type = "number")]
    pub max_price: Money,
    pub duration: u32,
    pub category: String,
}

impl Default for Filter {
    /// Empty destination/category, any duration, full seed price range.
    fn default() -> Self {
        Filter {
            destination: String::new(),
            min_price: Money::zero(),
            max_price: Money::from_major(DEFAULT_MAX_PRICE),
            duration: ANY_DURATION,
            category: String::new(),
        }
    }
}

/// A partial filter update. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Filter {
    /// Shallow-merges `patch` into a copy of this filter and validates the result.
    pub fn merged(&self, patch: &FilterPatch) -> Result<Filter, ValidationError> {
        let next = Filter {
            destination: patch
                .destination
                .clone()
                .unwrap_or_else(|| self.destination.clone()),
            min_price: patch.min_price.unwrap_or(self.min_price),
            max_price: patch.max_price.unwrap_or(self.max_price),
            duration: patch.duration.unwrap_or(self.duration),
            category: patch.category.clone().unwrap_or_else(|| self.category.clone()),
        };
        next.validate()?;
        Ok(next)
    }

    /// Checks the price range invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_price.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "minPrice".to_string(),
                min: 0,
                max: self.max_price.cents() / 100,
            });
        }
        if self.min_price > self.max_price {
            return Err(ValidationError::InvertedRange {
                min_field: "minPrice".to_string(),
                max_field: "maxPrice".to_string(),
            });
        }
        Ok(())
    }

    /// Resolves a category tab name (case-insensitive) to the stored
    /// category. `All` clears the category filter.
    pub fn category_from_tab(tab: &str) -> Result<String, ValidationError> {
        let tab = tab.trim();
        match CATEGORIES.iter().find(|c| c.eq_ignore_ascii_case(tab)) {
            Some(&"All") => Ok(String::new()),
            Some(category) => Ok(category.to_string()),
            None => Err(ValidationError::InvalidFormat {
                field: "category".to_string(),
            }),
        }
    }

    /// Returns true when the filter narrows nothing beyond the default.
    pub fn is_default(&self) -> bool {
        *self == Filter::default()
    }

    /// Evaluates the match rule for one offering.
    pub fn matches(&self, offering: &Offering, search: &str) -> bool {
        let needle = search.to_lowercase();
        let matches_search = offering.title.to_lowercase().contains(&needle)
            || offering.destination.to_lowercase().contains(&needle);
        let matches_destination =
            self.destination.is_empty() || offering.destination == self.destination;
        let matches_price = offering.price >= self.min_price && offering.price <= self.max_price;
        let matches_duration =
            self.duration == ANY_DURATION || offering.duration_days == self.duration;
        let matches_category = self.category.is_empty() || offering.category == self.category;

        matches_search && matches_destination && matches_price && matches_duration && matches_category
    }

    /// Returns every matching offering, in the catalog's original order.
    pub fn apply<'a>(&self, offerings: &'a [Offering], search: &str) -> Vec<&'a Offering> {
        offerings
            .iter()
            .filter(|offering| self.matches(offering, search))
            .collect()
    }
}
