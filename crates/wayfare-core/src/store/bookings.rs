//! Bookings container: the signed-in user's reservations and the status tab
//! used to narrow them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::AsyncPhase;
use crate::types::{Booking, BookingStatus};

/// Status tab of the bookings view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StatusTab {
    #[default]
    All,
    Confirmed,
    Pending,
    Cancelled,
}

impl StatusTab {
    /// Returns true when a booking with `status` belongs under this tab.
    pub fn admits(&self, status: BookingStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Confirmed => status == BookingStatus::Confirmed,
            StatusTab::Pending => status == BookingStatus::Pending,
            StatusTab::Cancelled => status == BookingStatus::Cancelled,
        }
    }
}

/// The bookings slice of the state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BookingsState {
    pub bookings: Vec<Booking>,
    pub tab: StatusTab,
    pub loading: bool,
    pub error: Option<String>,
}

impl BookingsState {
    /// Bookings under the active tab, in server order.
    pub fn visible(&self) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| self.tab.admits(b.status))
            .collect()
    }

    /// Count for a tab label.
    pub fn count(&self, status: BookingStatus) -> usize {
        self.bookings.iter().filter(|b| b.status == status).count()
    }

    pub fn reduce(&mut self, action: BookingsAction) {
        match action {
            BookingsAction::List(AsyncPhase::Pending) => {
                self.loading = true;
                self.error = None;
            }
            BookingsAction::List(AsyncPhase::Fulfilled(bookings)) => {
                self.loading = false;
                self.bookings = bookings;
            }
            BookingsAction::List(AsyncPhase::Rejected(message)) => {
                self.loading = false;
                self.error = Some(message);
            }
            BookingsAction::SetStatusTab(tab) => self.tab = tab,
            BookingsAction::Reset => *self = BookingsState::default(),
        }
    }
}

/// Actions owned by the bookings container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BookingsAction {
    List(AsyncPhase<Vec<Booking>>),
    SetStatusTab(StatusTab),
    Reset,
}

impl BookingsAction {
    pub fn name(&self) -> String {
        match self {
            BookingsAction::List(phase) => format!("list/{}", phase.label()),
            BookingsAction::SetStatusTab(_) => "setStatusTab".to_string(),
            BookingsAction::Reset => "reset".to_string(),
        }
    }
}
