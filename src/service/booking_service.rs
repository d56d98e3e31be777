//! Booking service: serializes reservations and announces seat changes.

use std::sync::Arc;

use crate::domain::{Booking, BookingRequest, SeatEvent, ShowingLocks};
use crate::error::GatewayError;
use crate::ledger::{LedgerError, SeatLedger};
use crate::ws::NotificationHub;

/// Coordinator for seat reservations.
///
/// Owns no persistent state: it holds the [`SeatLedger`] for storage,
/// the [`ShowingLocks`] table for serialization and the
/// [`NotificationHub`] for fan-out. Every booking follows the pattern:
/// validate → lock showing → reserve in ledger → unlock → broadcast.
///
/// A losing request is reported to its caller and never retried here.
#[derive(Debug)]
pub struct BookingService {
    ledger: Arc<dyn SeatLedger>,
    hub: Arc<NotificationHub>,
    locks: Arc<ShowingLocks>,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn SeatLedger>,
        hub: Arc<NotificationHub>,
        locks: Arc<ShowingLocks>,
    ) -> Self {
        Self { ledger, hub, locks }
    }

    /// Books every seat in `request`, or none.
    ///
    /// Blocks until the showing's critical section and the ledger
    /// transaction complete. On success a [`SeatEvent::SeatUpdate`] is
    /// broadcast; subscriber failures never affect the result.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::InvalidRequest`] for a blank client name, an empty
    ///   seat list or duplicate seats.
    /// - [`GatewayError::ShowingNotFound`] / [`GatewayError::SeatNotFound`]
    ///   for unknown references.
    /// - [`GatewayError::SeatUnavailable`] if any seat is already booked.
    /// - [`GatewayError::PersistenceError`] if the ledger failed; it has
    ///   rolled back.
    pub async fn book(&self, request: BookingRequest) -> Result<Vec<Booking>, GatewayError> {
        request.validate()?;
        let showing_id = request.showing_id;

        let guard = self.locks.lock(showing_id).await;
        let reserved = self
            .ledger
            .reserve(showing_id, &request.seat_ids, &request.client_name)
            .await;
        drop(guard);

        let bookings = match reserved {
            Ok(bookings) => bookings,
            Err(err) => {
                if matches!(err, LedgerError::ShowingNotFound(_)) {
                    self.locks.release(showing_id).await;
                }
                match &err {
                    LedgerError::Storage(msg) => {
                        tracing::error!(%showing_id, error = %msg, "reservation failed in storage");
                    }
                    other => {
                        tracing::info!(%showing_id, reason = %other, "reservation refused");
                    }
                }
                return Err(err.into());
            }
        };

        let delivered = self
            .hub
            .broadcast(&SeatEvent::SeatUpdate { showing_id })
            .await;

        tracing::info!(
            %showing_id,
            client = %request.client_name,
            seat_count = bookings.len(),
            delivered,
            "seats booked"
        );
        Ok(bookings)
    }
}
