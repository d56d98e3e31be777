//! # cinema-gateway
//!
//! Seat booking service for cinema showings with live seat-map updates.
//!
//! Clients book one or more seats of a showing in a single all-or-nothing
//! request. Bookings for the same showing are serialized, so a seat is
//! never handed to two clients. Every successful booking is pushed to all
//! connected WebSocket clients as a `seat_update` event.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── AdmissionController (admission/)   mutating routes only
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── BookingService / ShowingService (service/)
//!     ├── ShowingLocks (domain/)
//!     ├── NotificationHub (ws/)
//!     │
//!     └── SeatLedger (ledger/)
//!           ├── InMemorySeatLedger
//!           └── PostgresSeatLedger
//! ```

pub mod admission;
pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod server;
pub mod service;
pub mod ws;
