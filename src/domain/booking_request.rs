//! Transient booking request and its shape validation.

use std::collections::HashSet;

use super::{SeatId, ShowingId};
use crate::error::GatewayError;

/// A request to book one or more seats of a single showing.
///
/// Not persisted. Must carry a non-blank client name and a non-empty set
/// of distinct seat ids before it reaches the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Client name recorded on every resulting booking.
    pub client_name: String,
    /// Showing the seats belong to.
    pub showing_id: ShowingId,
    /// Seats to reserve, all-or-nothing.
    pub seat_ids: Vec<SeatId>,
}

impl BookingRequest {
    /// Creates a request without validating it.
    #[must_use]
    pub fn new(client_name: impl Into<String>, showing_id: ShowingId, seat_ids: Vec<SeatId>) -> Self {
        Self {
            client_name: client_name.into(),
            showing_id,
            seat_ids,
        }
    }

    /// Checks the request shape.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the client name is blank,
    /// the seat list is empty, or a seat id appears more than once.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.client_name.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "user_name must not be empty".to_string(),
            ));
        }
        if self.seat_ids.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "seat_ids must contain at least one seat".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.seat_ids.len());
        for seat_id in &self.seat_ids {
            if !seen.insert(*seat_id) {
                return Err(GatewayError::InvalidRequest(format!(
                    "seat {seat_id} requested more than once"
                )));
            }
        }
        Ok(())
    }
}
