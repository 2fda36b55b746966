//! Bookings container operations.

use tracing::info;

use wayfare_core::store::{AsyncPhase, BookingsAction, StatusTab};
use wayfare_core::Booking;

use super::Storefront;
use crate::error::{ApiError, ApiResult};

impl Storefront {
    /// Loads the signed-in user's bookings. Requires an access token.
    pub async fn list_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.dispatch(BookingsAction::List(AsyncPhase::Pending)).await;

        let Some(token) = self.read(|s| s.auth.token.clone()) else {
            let error = ApiError::missing_token();
            self.dispatch(BookingsAction::List(AsyncPhase::Rejected(error.message.clone())))
                .await;
            return Err(error);
        };

        let outcome = self
            .backends()
            .bookings
            .list_bookings(&token)
            .await
            .map_err(ApiError::from);
        if let Ok(bookings) = &outcome {
            info!(count = bookings.len(), "Bookings loaded");
        }

        self.dispatch(BookingsAction::List(AsyncPhase::settle(
            outcome.clone().map_err(|e| e.message),
        )))
        .await;
        outcome
    }

    pub async fn set_status_tab(&self, tab: StatusTab) {
        self.dispatch(BookingsAction::SetStatusTab(tab)).await;
    }

    /// Bookings under the active status tab.
    pub fn visible_bookings(&self) -> Vec<Booking> {
        self.read(|s| s.bookings.visible().into_iter().cloned().collect())
    }
}
