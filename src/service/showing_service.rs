//! Showing catalog and seat map reads.

use std::sync::Arc;

use crate::domain::{NewShowing, Seat, SeatLayout, Showing, ShowingId, ShowingLocks};
use crate::error::GatewayError;
use crate::ledger::{LedgerError, SeatLedger};

/// Catalog operations over the [`SeatLedger`].
///
/// Deleting a showing takes the same per-showing lock as bookings, so a
/// delete never interleaves with a reservation of that showing.
#[derive(Debug)]
pub struct ShowingService {
    ledger: Arc<dyn SeatLedger>,
    locks: Arc<ShowingLocks>,
    layout: SeatLayout,
}

impl ShowingService {
    /// Creates a new `ShowingService` generating `layout` for new showings.
    #[must_use]
    pub fn new(ledger: Arc<dyn SeatLedger>, locks: Arc<ShowingLocks>, layout: SeatLayout) -> Self {
        Self {
            ledger,
            locks,
            layout,
        }
    }

    /// Returns every showing.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    pub async fn list_showings(&self) -> Result<Vec<Showing>, GatewayError> {
        Ok(self.ledger.list_showings().await?)
    }

    /// Creates a showing and its seat grid.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a blank title or a
    /// negative duration, or [`GatewayError::PersistenceError`] on storage
    /// failure.
    pub async fn create_showing(&self, showing: NewShowing) -> Result<Showing, GatewayError> {
        if showing.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }
        if showing.duration_minutes < 0 {
            return Err(GatewayError::InvalidRequest(
                "duration must not be negative".to_string(),
            ));
        }
        let created = self.ledger.create_showing(showing, self.layout).await?;
        tracing::info!(
            showing_id = %created.id,
            title = %created.title,
            seats = self.layout.capacity(),
            "showing created"
        );
        Ok(created)
    }

    /// Deletes a showing with its seats and bookings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ShowingNotFound`] if the showing does not
    /// exist, or [`GatewayError::PersistenceError`] on storage failure.
    pub async fn delete_showing(&self, showing_id: ShowingId) -> Result<(), GatewayError> {
        let guard = self.locks.lock(showing_id).await;
        let deleted = self.ledger.delete_showing(showing_id).await;
        drop(guard);

        if matches!(deleted, Ok(()) | Err(LedgerError::ShowingNotFound(_))) {
            self.locks.release(showing_id).await;
        }
        deleted?;
        tracing::info!(%showing_id, "showing removed");
        Ok(())
    }

    /// Returns the seats of a showing sorted by label.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ShowingNotFound`] if the showing does not
    /// exist, or [`GatewayError::PersistenceError`] on storage failure.
    pub async fn list_seats(&self, showing_id: ShowingId) -> Result<Vec<Seat>, GatewayError> {
        Ok(self.ledger.list_seats(showing_id).await?)
    }
}
