//! Domain layer: identifiers, seat records, booking requests, events and
//! the per-showing lock table.
//!
//! Nothing in this module performs I/O. Storage lives behind
//! [`crate::ledger::SeatLedger`] and fan-out behind
//! [`crate::ws::NotificationHub`].

pub mod booking_request;
pub mod ids;
pub mod seat;
pub mod seat_event;
pub mod showing_locks;

pub use booking_request::BookingRequest;
pub use ids::{BookingId, ClientId, SeatId, ShowingId};
pub use seat::{Booking, NewShowing, Seat, SeatLayout, Showing};
pub use seat_event::SeatEvent;
pub use showing_locks::ShowingLocks;
