//! `bookings` command.

use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use wayfare_core::store::StatusTab;
use wayfare_core::BookingStatus;

use crate::error::ApiResult;
use crate::state::Storefront;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    All,
    Confirmed,
    Pending,
    Cancelled,
}

impl From<StatusArg> for StatusTab {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusTab::All,
            StatusArg::Confirmed => StatusTab::Confirmed,
            StatusArg::Pending => StatusTab::Pending,
            StatusArg::Cancelled => StatusTab::Cancelled,
        }
    }
}

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    pub status: StatusArg,
}

pub async fn bookings(store: &Storefront, args: BookingsArgs) -> ApiResult<Value> {
    let all = store.list_bookings().await?;
    store.set_status_tab(args.status.into()).await;

    let state = store.snapshot().bookings;
    Ok(json!({
        "tab": state.tab,
        "counts": {
            "all": all.len(),
            "confirmed": state.count(BookingStatus::Confirmed),
            "pending": state.count(BookingStatus::Pending),
            "cancelled": state.count(BookingStatus::Cancelled),
        },
        "bookings": store.visible_bookings(),
    }))
}
