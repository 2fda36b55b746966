//! Catalog commands: `packages`, `package`, `featured`.

use clap::Args;
use serde_json::{json, Value};

use wayfare_core::{Filter, FilterPatch, Money, ValidationError};

use crate::error::ApiResult;
use crate::state::Storefront;

#[derive(Debug, Args)]
pub struct PackagesArgs {
    /// Free-text search over title and destination
    #[arg(long, default_value = "")]
    pub search: String,

    /// Exact destination
    #[arg(long)]
    pub destination: Option<String>,

    /// Category tab (All, Beach, Adventure, City, Cultural, Luxury, Budget)
    #[arg(long)]
    pub category: Option<String>,

    /// Lowest price, whole currency units
    #[arg(long)]
    pub min_price: Option<i64>,

    /// Highest price, whole currency units
    #[arg(long)]
    pub max_price: Option<i64>,

    /// Exact duration in days
    #[arg(long)]
    pub duration: Option<u32>,
}

impl PackagesArgs {
    fn filter_patch(&self) -> Result<FilterPatch, ValidationError> {
        Ok(FilterPatch {
            destination: self.destination.clone(),
            min_price: self.min_price.map(|p| price("minPrice", p)).transpose()?,
            max_price: self.max_price.map(|p| price("maxPrice", p)).transpose()?,
            duration: self.duration,
            category: self
                .category
                .as_deref()
                .map(Filter::category_from_tab)
                .transpose()?,
        })
    }
}

fn price(field: &str, major: i64) -> Result<Money, ValidationError> {
    Money::checked_from_major(major).ok_or_else(|| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: Money::MAX_MAJOR,
    })
}

pub async fn packages(store: &Storefront, args: PackagesArgs) -> ApiResult<Value> {
    let patch = args.filter_patch()?;
    let loaded = store.list_offerings().await;
    let filters = store.set_filters(patch).await?;
    let visible = store.visible_offerings(&args.search);

    Ok(json!({
        "source": loaded.source,
        "filtered": !filters.is_default(),
        "filters": filters,
        "count": visible.len(),
        "packages": visible,
    }))
}

pub async fn package(store: &Storefront, id: &str) -> ApiResult<Value> {
    let loaded = store.fetch_offering_by_id(id).await?;
    Ok(json!({
        "source": loaded.source,
        "package": loaded.data,
    }))
}

pub async fn featured(store: &Storefront) -> ApiResult<Value> {
    let loaded = store.list_featured().await;
    Ok(json!({
        "source": loaded.source,
        "packages": loaded.data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PackagesArgs {
        PackagesArgs {
            search: String::new(),
            destination: None,
            category: None,
            min_price: None,
            max_price: None,
            duration: None,
        }
    }

    #[test]
    fn test_price_flags_convert_to_cents() {
        let patch = PackagesArgs {
            min_price: Some(100),
            max_price: Some(Money::MAX_MAJOR),
            ..args()
        }
        .filter_patch()
        .unwrap();

        assert_eq!(patch.min_price, Some(Money::from_cents(10_000)));
        assert_eq!(patch.max_price, Some(Money::from_cents(Money::MAX_MAJOR * 100)));
    }

    #[test]
    fn test_oversized_price_is_a_validation_error() {
        let err = PackagesArgs {
            max_price: Some(100_000_000_000_000_000),
            ..args()
        }
        .filter_patch()
        .unwrap_err();

        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "maxPrice"));
    }

    #[test]
    fn test_category_flag_uses_tab_names() {
        let patch = PackagesArgs {
            category: Some("all".into()),
            ..args()
        }
        .filter_patch()
        .unwrap();
        assert_eq!(patch.category.as_deref(), Some(""));

        let err = PackagesArgs {
            category: Some("Space".into()),
            ..args()
        }
        .filter_patch()
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }
}
