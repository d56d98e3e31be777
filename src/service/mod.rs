//! Service layer: business logic orchestration.
//!
//! [`BookingService`] coordinates reservations and emits events through
//! the [`super::ws::NotificationHub`]; [`ShowingService`] covers the
//! catalog and seat maps.

pub mod booking_service;
pub mod showing_service;

pub use booking_service::BookingService;
pub use showing_service::ShowingService;
