//! Process-local [`SeatLedger`] used when persistence is disabled.
//!
//! All state sits behind one [`tokio::sync::Mutex`], so every operation is
//! a transaction: checks and writes happen under the same guard and a
//! failed reservation returns before the first write.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{LedgerError, SeatLedger, first_duplicate};
use crate::domain::{
    Booking, BookingId, NewShowing, Seat, SeatId, SeatLayout, Showing, ShowingId,
};

#[derive(Debug, Default)]
struct Store {
    showings: BTreeMap<ShowingId, Showing>,
    seats: BTreeMap<SeatId, Seat>,
    bookings: BTreeMap<BookingId, Booking>,
    last_showing_id: i64,
    last_seat_id: i64,
    last_booking_id: i64,
}

impl Store {
    fn next_showing_id(&mut self) -> ShowingId {
        self.last_showing_id = self.last_showing_id.saturating_add(1);
        ShowingId::new(self.last_showing_id)
    }

    fn next_seat_id(&mut self) -> SeatId {
        self.last_seat_id = self.last_seat_id.saturating_add(1);
        SeatId::new(self.last_seat_id)
    }

    fn next_booking_id(&mut self) -> BookingId {
        self.last_booking_id = self.last_booking_id.saturating_add(1);
        BookingId::new(self.last_booking_id)
    }

    fn ensure_showing(&self, showing_id: ShowingId) -> Result<(), LedgerError> {
        if self.showings.contains_key(&showing_id) {
            Ok(())
        } else {
            Err(LedgerError::ShowingNotFound(showing_id))
        }
    }
}

/// In-memory seat ledger. Cheap to construct, lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySeatLedger {
    store: Mutex<Store>,
}

impl InMemorySeatLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeatLedger for InMemorySeatLedger {
    async fn list_showings(&self) -> Result<Vec<Showing>, LedgerError> {
        let store = self.store.lock().await;
        Ok(store.showings.values().cloned().collect())
    }

    async fn create_showing(
        &self,
        showing: NewShowing,
        layout: SeatLayout,
    ) -> Result<Showing, LedgerError> {
        let mut store = self.store.lock().await;
        let id = store.next_showing_id();
        let created = Showing {
            id,
            title: showing.title,
            duration_minutes: showing.duration_minutes,
            showtime: showing.showtime,
            poster: showing.poster,
        };
        for label in layout.labels() {
            let seat_id = store.next_seat_id();
            store.seats.insert(
                seat_id,
                Seat {
                    id: seat_id,
                    showing_id: id,
                    label,
                    is_booked: false,
                },
            );
        }
        store.showings.insert(id, created.clone());
        Ok(created)
    }

    async fn delete_showing(&self, showing_id: ShowingId) -> Result<(), LedgerError> {
        let mut store = self.store.lock().await;
        if store.showings.remove(&showing_id).is_none() {
            return Err(LedgerError::ShowingNotFound(showing_id));
        }
        store.seats.retain(|_, seat| seat.showing_id != showing_id);
        store
            .bookings
            .retain(|_, booking| booking.showing_id != showing_id);
        Ok(())
    }

    async fn list_seats(&self, showing_id: ShowingId) -> Result<Vec<Seat>, LedgerError> {
        let store = self.store.lock().await;
        store.ensure_showing(showing_id)?;
        let mut seats: Vec<Seat> = store
            .seats
            .values()
            .filter(|seat| seat.showing_id == showing_id)
            .cloned()
            .collect();
        seats.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(seats)
    }

    async fn list_bookings(&self, showing_id: ShowingId) -> Result<Vec<Booking>, LedgerError> {
        let store = self.store.lock().await;
        store.ensure_showing(showing_id)?;
        Ok(store
            .bookings
            .values()
            .filter(|booking| booking.showing_id == showing_id)
            .cloned()
            .collect())
    }

    async fn reserve(
        &self,
        showing_id: ShowingId,
        seat_ids: &[SeatId],
        client_name: &str,
    ) -> Result<Vec<Booking>, LedgerError> {
        if let Some(seat_id) = first_duplicate(seat_ids) {
            return Err(LedgerError::DuplicateSeat(seat_id));
        }
        let mut store = self.store.lock().await;
        store.ensure_showing(showing_id)?;

        // Check phase: no writes until every seat has passed.
        for seat_id in seat_ids {
            match store.seats.get(seat_id) {
                Some(seat) if seat.showing_id == showing_id => {
                    if seat.is_booked {
                        return Err(LedgerError::SeatAlreadyBooked(*seat_id));
                    }
                }
                _ => return Err(LedgerError::SeatNotFound(*seat_id)),
            }
        }

        let created_at = Utc::now();
        let mut bookings = Vec::with_capacity(seat_ids.len());
        for seat_id in seat_ids {
            if let Some(seat) = store.seats.get_mut(seat_id) {
                seat.is_booked = true;
            }
            let booking = Booking {
                id: store.next_booking_id(),
                client_name: client_name.to_string(),
                showing_id,
                seat_id: *seat_id,
                created_at,
            };
            store.bookings.insert(booking.id, booking.clone());
            bookings.push(booking);
        }
        Ok(bookings)
    }
}
