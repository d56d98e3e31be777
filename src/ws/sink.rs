//! Transport seam between the hub and live connections.

use std::fmt;

use tokio::sync::mpsc;

/// Delivery to a subscriber failed because its connection is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("subscriber connection closed")]
pub struct DeliveryError;

/// A live connection the hub can push to.
///
/// `deliver` must not block on the network: the hub calls it for every
/// subscriber in turn.
pub trait SubscriberSink: Send + Sync + fmt::Debug {
    /// Queues one serialized event for the connection.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the connection can no longer accept
    /// events.
    fn deliver(&self, payload: &str) -> Result<(), DeliveryError>;

    /// Asks the connection to shut down. Idempotent.
    fn close(&self);
}

/// Frames queued for a connection's writer loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A serialized event to write as a text frame.
    Event(String),
    /// Close the socket and stop.
    Close,
}

/// [`SubscriberSink`] backed by an unbounded channel drained by the
/// connection's writer loop.
///
/// The channel is unbounded: a slow reader is never dropped for lag, only
/// for a closed connection.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its writer loop should drain.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SubscriberSink for ChannelSink {
    fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        self.tx
            .send(Outbound::Event(payload.to_string()))
            .map_err(|_| DeliveryError)
    }

    fn close(&self) {
        let _ = self.tx.send(Outbound::Close);
    }
}
