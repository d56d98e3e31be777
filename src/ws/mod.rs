//! WebSocket layer: subscriber registry, transport sink, connections.
//!
//! The endpoint at `/ws` is push-only. Every successful booking sends
//! `{"type": "seat_update", "showing_id": N}` to each connected client.

pub mod connection;
pub mod handler;
pub mod hub;
pub mod sink;

pub use hub::{NotificationHub, SubscriberId};
pub use sink::{ChannelSink, DeliveryError, Outbound, SubscriberSink};
