//! Seat ledger: the transactional store behind the booking core.
//!
//! [`SeatLedger`] is the contract the services depend on. It owns all
//! showing, seat and booking state. [`InMemorySeatLedger`] backs tests and
//! persistence-disabled deployments; [`PostgresSeatLedger`] uses
//! `sqlx::PgPool` transactions.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Booking, NewShowing, Seat, SeatId, SeatLayout, Showing, ShowingId};

pub use memory::InMemorySeatLedger;
pub use postgres::PostgresSeatLedger;

/// Failures reported by a [`SeatLedger`].
///
/// Every failure of [`SeatLedger::reserve`] leaves seat and booking state
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The showing does not exist.
    #[error("showing {0} not found")]
    ShowingNotFound(ShowingId),

    /// The seat does not exist or belongs to another showing.
    #[error("seat {0} not found")]
    SeatNotFound(SeatId),

    /// The seat is already booked.
    #[error("seat {0} is already booked")]
    SeatAlreadyBooked(SeatId),

    /// The same seat appears more than once in one reservation.
    #[error("seat {0} requested more than once")]
    DuplicateSeat(SeatId),

    /// The underlying store failed; the transaction was rolled back.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Transactional store for showings, seats and bookings.
#[async_trait]
pub trait SeatLedger: Send + Sync + std::fmt::Debug {
    /// Returns all showings ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on store failure.
    async fn list_showings(&self) -> Result<Vec<Showing>, LedgerError>;

    /// Creates a showing together with its full seat grid, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on store failure; nothing is
    /// created in that case.
    async fn create_showing(
        &self,
        showing: NewShowing,
        layout: SeatLayout,
    ) -> Result<Showing, LedgerError>;

    /// Deletes a showing with its seats and bookings, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ShowingNotFound`] if the showing does not
    /// exist, or [`LedgerError::Storage`] on store failure.
    async fn delete_showing(&self, showing_id: ShowingId) -> Result<(), LedgerError>;

    /// Returns the seats of a showing sorted by label.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ShowingNotFound`] if the showing does not
    /// exist, or [`LedgerError::Storage`] on store failure.
    async fn list_seats(&self, showing_id: ShowingId) -> Result<Vec<Seat>, LedgerError>;

    /// Returns the bookings of a showing ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ShowingNotFound`] if the showing does not
    /// exist, or [`LedgerError::Storage`] on store failure.
    async fn list_bookings(&self, showing_id: ShowingId) -> Result<Vec<Booking>, LedgerError>;

    /// Reserves every seat in `seat_ids` for `client_name`, or none of them.
    ///
    /// Inside one transaction: verifies the showing exists and that every
    /// seat exists, belongs to the showing and is unbooked; then marks the
    /// seats booked and inserts one [`Booking`] per seat, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateSeat`] if `seat_ids` repeats a seat,
    /// [`LedgerError::ShowingNotFound`], [`LedgerError::SeatNotFound`] or
    /// [`LedgerError::SeatAlreadyBooked`] for the first failing check, or
    /// [`LedgerError::Storage`] on store failure. No state changes are
    /// visible after any error.
    async fn reserve(
        &self,
        showing_id: ShowingId,
        seat_ids: &[SeatId],
        client_name: &str,
    ) -> Result<Vec<Booking>, LedgerError>;
}

/// Returns the first seat that appears twice in `seat_ids`.
pub(crate) fn first_duplicate(seat_ids: &[SeatId]) -> Option<SeatId> {
    let mut seen = std::collections::HashSet::with_capacity(seat_ids.len());
    seat_ids.iter().copied().find(|id| !seen.insert(*id))
}
