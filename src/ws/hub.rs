//! Registry of live subscribers and event fan-out.
//!
//! [`NotificationHub`] owns the subscriber set. `broadcast` works on a
//! snapshot taken under the lock, delivers outside it, then evicts every
//! subscriber whose delivery failed. Membership heals itself from send
//! failures; there is no separate health check.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::sink::SubscriberSink;
use crate::domain::SeatEvent;

/// Identifier assigned to a subscriber on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(uuid::Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct Subscriber {
    sink: Arc<dyn SubscriberSink>,
    registered_at: DateTime<Utc>,
}

/// Fan-out hub for [`SeatEvent`]s.
///
/// No acknowledgements and no cross-subscriber ordering. A subscriber that
/// joins while a broadcast is running may or may not see that event.
#[derive(Debug, Default)]
pub struct NotificationHub {
    subscribers: Mutex<HashMap<SubscriberId, Subscriber>>,
}

impl NotificationHub {
    /// Creates a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live connection.
    pub async fn subscribe(&self, sink: Arc<dyn SubscriberSink>) -> SubscriberId {
        let id = SubscriberId::new();
        let mut subscribers = self.subscribers.lock().await;
        subscribers.insert(
            id,
            Subscriber {
                sink,
                registered_at: Utc::now(),
            },
        );
        tracing::debug!(subscriber_id = %id, total = subscribers.len(), "subscriber registered");
        id
    }

    /// Removes a subscriber and closes its connection handle.
    ///
    /// Returns `false` if it was already gone (e.g. evicted by a failed
    /// broadcast).
    pub async fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.lock().await.remove(&id);
        match removed {
            Some(subscriber) => {
                subscriber.sink.close();
                let connected_for = Utc::now() - subscriber.registered_at;
                tracing::debug!(
                    subscriber_id = %id,
                    connected_secs = connected_for.num_seconds(),
                    "subscriber removed"
                );
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to every current subscriber.
    ///
    /// Subscribers whose delivery fails are removed and closed. Returns
    /// the number of successful deliveries. Never fails.
    pub async fn broadcast(&self, event: &SeatEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize seat event");
                return 0;
            }
        };

        let snapshot: Vec<(SubscriberId, Arc<dyn SubscriberSink>)> = {
            let subscribers = self.subscribers.lock().await;
            subscribers
                .iter()
                .map(|(id, sub)| (*id, Arc::clone(&sub.sink)))
                .collect()
        };

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, sink) in &snapshot {
            match sink.deliver(&payload) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::warn!(subscriber_id = %id, error = %err, "dropping subscriber");
                    failed.push(*id);
                }
            }
        }

        if !failed.is_empty() {
            let mut subscribers = self.subscribers.lock().await;
            for id in &failed {
                if let Some(subscriber) = subscribers.remove(id) {
                    subscriber.sink.close();
                }
            }
        }

        tracing::debug!(
            event = event.event_type_str(),
            showing_id = %event.showing_id(),
            delivered,
            evicted = failed.len(),
            "seat event broadcast"
        );
        delivered
    }

    /// Number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}
