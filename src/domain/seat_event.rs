//! State-change events pushed to live subscribers.
//!
//! Events carry no seat state. A subscriber that receives one re-fetches
//! the seat list for the named showing.

use serde::Serialize;

use super::ShowingId;

/// Event broadcast through the [`crate::ws::NotificationHub`].
///
/// Serialized as `{"type": "seat_update", "showing_id": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatEvent {
    /// One or more seats of the showing were booked.
    SeatUpdate {
        /// Showing whose seat map changed.
        showing_id: ShowingId,
    },
}

impl SeatEvent {
    /// Returns the showing this event concerns.
    #[must_use]
    pub const fn showing_id(&self) -> ShowingId {
        match self {
            Self::SeatUpdate { showing_id } => *showing_id,
        }
    }

    /// Returns the wire discriminator.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::SeatUpdate { .. } => "seat_update",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn seat_update_wire_shape() {
        let event = SeatEvent::SeatUpdate {
            showing_id: ShowingId::new(3),
        };
        let Ok(value) = serde_json::to_value(event) else {
            panic!("serialization failed");
        };
        assert_eq!(
            value,
            serde_json::json!({"type": "seat_update", "showing_id": 3})
        );
        assert_eq!(event.event_type_str(), "seat_update");
        assert_eq!(event.showing_id(), ShowingId::new(3));
    }
}
