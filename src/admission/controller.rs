//! Per-client concurrency budget with idle eviction.
//!
//! Each [`ClientId`] owns a [`Semaphore`] with `burst` permits. A request
//! takes one permit without waiting and gives it back when its
//! [`AdmissionSlot`] is dropped. This caps requests *in flight*; it is not
//! a requests-per-second limiter.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::ClientId;
use crate::error::GatewayError;

/// Admission tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Permits per client.
    pub burst: usize,
    /// Sweep period.
    pub window: Duration,
    /// Entries idle longer than this are evicted.
    pub idle_threshold: Duration,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            burst: 10,
            window: Duration::from_secs(60),
            idle_threshold: Duration::from_secs(180),
        }
    }
}

#[derive(Debug)]
struct AdmissionEntry {
    slots: Arc<Semaphore>,
    last_seen: Instant,
}

/// One unit of a client's concurrency budget.
///
/// Released exactly once, when dropped. That covers normal returns, early
/// `?` returns and unwinding. If the owning entry was evicted meanwhile the
/// permit returns to the detached semaphore and nothing else observes it.
#[derive(Debug)]
pub struct AdmissionSlot {
    client: ClientId,
    _permit: OwnedSemaphorePermit,
}

impl AdmissionSlot {
    /// Returns the client holding this slot.
    #[must_use]
    pub fn client(&self) -> &ClientId {
        &self.client
    }
}

/// Gatekeeper for mutating requests, keyed by client identity.
#[derive(Debug)]
pub struct AdmissionController {
    config: AdmissionConfig,
    entries: Mutex<HashMap<ClientId, AdmissionEntry>>,
}

impl AdmissionController {
    /// Creates a controller with no tracked clients.
    #[must_use]
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config: AdmissionConfig {
                burst: config.burst.max(1),
                ..config
            },
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> AdmissionConfig {
        self.config
    }

    /// Takes one slot from `client`'s budget without waiting.
    ///
    /// Creates the client's entry on first use and refreshes its
    /// last-activity time on every call, admitted or not.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AdmissionRejected`] if all `burst` slots of
    /// this client are in flight.
    pub async fn acquire(&self, client: &ClientId) -> Result<AdmissionSlot, GatewayError> {
        let slots = {
            let mut entries = self.entries.lock().await;
            let entry = entries
                .entry(client.clone())
                .or_insert_with(|| AdmissionEntry {
                    slots: Arc::new(Semaphore::new(self.config.burst)),
                    last_seen: Instant::now(),
                });
            entry.last_seen = Instant::now();
            Arc::clone(&entry.slots)
        };

        match slots.try_acquire_owned() {
            Ok(permit) => Ok(AdmissionSlot {
                client: client.clone(),
                _permit: permit,
            }),
            Err(_) => {
                tracing::debug!(%client, burst = self.config.burst, "admission rejected");
                Err(GatewayError::AdmissionRejected)
            }
        }
    }

    /// Removes every entry idle for longer than the idle threshold, as of
    /// `now`. Returns the number of evicted entries.
    pub async fn sweep_idle_at(&self, now: Instant) -> usize {
        let threshold = self.config.idle_threshold;
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= threshold);
        before - entries.len()
    }

    /// Removes every entry idle for longer than the idle threshold.
    pub async fn sweep_idle(&self) -> usize {
        self.sweep_idle_at(Instant::now()).await
    }

    /// Number of client identities currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Free slots for `client`, or `None` if the client is not tracked.
    pub async fn available_slots(&self, client: &ClientId) -> Option<usize> {
        let entries = self.entries.lock().await;
        entries
            .get(client)
            .map(|entry| entry.slots.available_permits())
    }

    /// Spawns the periodic idle sweep.
    ///
    /// Runs every `window` until the controller is dropped; it holds only a
    /// weak reference so it never keeps the controller alive.
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let controller: Weak<Self> = Arc::downgrade(self);
        let period = self.config.window;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                let evicted = controller.sweep_idle().await;
                if evicted > 0 {
                    tracing::debug!(evicted, "admission entries evicted");
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn controller(burst: usize) -> AdmissionController {
        AdmissionController::new(AdmissionConfig {
            burst,
            window: Duration::from_secs(60),
            idle_threshold: Duration::from_secs(180),
        })
    }

    #[tokio::test]
    async fn burst_plus_one_is_rejected() {
        let ctl = controller(3);
        let client = ClientId::new("10.0.0.1");

        let mut held = Vec::new();
        for _ in 0..3 {
            held.push(assert_ok!(ctl.acquire(&client).await));
        }
        let err = assert_err!(ctl.acquire(&client).await);
        assert!(matches!(err, GatewayError::AdmissionRejected));

        // Completing any in-flight request frees a slot.
        held.pop();
        assert_ok!(ctl.acquire(&client).await);
    }

    #[tokio::test]
    async fn clients_have_independent_budgets() {
        let ctl = controller(1);
        let a = ClientId::new("10.0.0.1");
        let b = ClientId::new("10.0.0.2");

        let _slot_a = assert_ok!(ctl.acquire(&a).await);
        assert_err!(ctl.acquire(&a).await);
        let slot_b = assert_ok!(ctl.acquire(&b).await);
        assert_eq!(slot_b.client(), &b);
    }

    #[tokio::test]
    async fn sequential_requests_are_unbounded() {
        let ctl = controller(1);
        let client = ClientId::new("10.0.0.1");
        for _ in 0..100 {
            let slot = assert_ok!(ctl.acquire(&client).await);
            drop(slot);
        }
        assert_eq!(ctl.available_slots(&client).await, Some(1));
    }

    #[tokio::test]
    async fn slot_released_on_error_path() {
        async fn guarded(ctl: &AdmissionController, client: &ClientId) -> Result<(), GatewayError> {
            let _slot = ctl.acquire(client).await?;
            Err(GatewayError::Internal("boom".to_string()))
        }

        let ctl = controller(1);
        let client = ClientId::new("10.0.0.1");
        assert_err!(guarded(&ctl, &client).await);
        assert_eq!(ctl.available_slots(&client).await, Some(1));
    }

    #[tokio::test]
    async fn slot_released_when_task_panics() {
        let ctl = Arc::new(controller(1));
        let client = ClientId::new("10.0.0.1");

        let task_ctl = Arc::clone(&ctl);
        let task_client = client.clone();
        let joined = tokio::spawn(async move {
            let _slot = task_ctl.acquire(&task_client).await;
            panic!("handler crashed");
        })
        .await;
        assert!(joined.is_err());
        assert_eq!(ctl.available_slots(&client).await, Some(1));
    }

    #[tokio::test]
    async fn idle_entries_are_evicted() {
        let ctl = controller(1);
        let client = ClientId::new("10.0.0.1");
        let slot = assert_ok!(ctl.acquire(&client).await);
        drop(slot);

        assert_eq!(ctl.sweep_idle().await, 0);
        assert_eq!(ctl.tracked_clients().await, 1);

        let later = Instant::now() + Duration::from_secs(181);
        assert_eq!(ctl.sweep_idle_at(later).await, 1);
        assert_eq!(ctl.tracked_clients().await, 0);
        assert_eq!(ctl.available_slots(&client).await, None);
    }

    #[tokio::test]
    async fn eviction_with_slot_in_flight_is_safe() {
        let ctl = controller(1);
        let client = ClientId::new("10.0.0.1");
        let in_flight = assert_ok!(ctl.acquire(&client).await);

        let later = Instant::now() + Duration::from_secs(600);
        assert_eq!(ctl.sweep_idle_at(later).await, 1);

        // The client is treated as new, and the stale slot drops harmlessly.
        let fresh = assert_ok!(ctl.acquire(&client).await);
        drop(in_flight);
        assert_eq!(ctl.available_slots(&client).await, Some(0));
        drop(fresh);
        assert_eq!(ctl.available_slots(&client).await, Some(1));
    }

    #[tokio::test]
    async fn sweeper_stops_when_controller_dropped() {
        let ctl = Arc::new(AdmissionController::new(AdmissionConfig {
            burst: 1,
            window: Duration::from_millis(10),
            idle_threshold: Duration::from_millis(10),
        }));
        let handle = ctl.spawn_sweeper();
        drop(ctl);
        let finished = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn sweeper_evicts_in_background() {
        let ctl = Arc::new(AdmissionController::new(AdmissionConfig {
            burst: 1,
            window: Duration::from_millis(10),
            idle_threshold: Duration::from_millis(5),
        }));
        let _handle = ctl.spawn_sweeper();
        drop(assert_ok!(ctl.acquire(&ClientId::new("10.0.0.9")).await));

        let mut evicted = false;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if ctl.tracked_clients().await == 0 {
                evicted = true;
                break;
            }
        }
        assert!(evicted, "sweeper never evicted the idle entry");
    }
}
