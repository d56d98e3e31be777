//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::admission::AdmissionController;
use crate::domain::{SeatLayout, ShowingLocks};
use crate::ledger::SeatLedger;
use crate::service::{BookingService, ShowingService};
use crate::ws::NotificationHub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking coordination.
    pub booking_service: Arc<BookingService>,
    /// Showing catalog and seat maps.
    pub showing_service: Arc<ShowingService>,
    /// Per-client in-flight request budget.
    pub admission: Arc<AdmissionController>,
    /// WebSocket subscriber registry.
    pub hub: Arc<NotificationHub>,
}

impl AppState {
    /// Wires the services around one ledger, sharing a single lock table
    /// and hub between them.
    #[must_use]
    pub fn new(ledger: Arc<dyn SeatLedger>, admission: Arc<AdmissionController>) -> Self {
        let hub = Arc::new(NotificationHub::new());
        let locks = Arc::new(ShowingLocks::new());
        let booking_service = Arc::new(BookingService::new(
            Arc::clone(&ledger),
            Arc::clone(&hub),
            Arc::clone(&locks),
        ));
        let showing_service = Arc::new(ShowingService::new(ledger, locks, SeatLayout::STANDARD));
        Self {
            booking_service,
            showing_service,
            admission,
            hub,
        }
    }
}
