//! Per-showing exclusive locks for the booking critical section.
//!
//! [`ShowingLocks`] maps each showing to its own [`tokio::sync::Mutex`].
//! Reservations for the same showing are strictly serialized while
//! reservations for different showings proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::ShowingId;

/// Lazily populated lock table keyed by [`ShowingId`].
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<Mutex<()>>` for the critical section itself. Entries are created
/// on first use and live until [`ShowingLocks::release`] finds them idle,
/// which callers do once a showing is known to be gone.
///
/// # Concurrency
///
/// - Looking up an existing lock only takes the outer read lock.
/// - Holding one showing's guard never blocks another showing.
/// - Guards are owned, so they can be held across `.await` points.
#[derive(Debug, Default)]
pub struct ShowingLocks {
    locks: RwLock<HashMap<ShowingId, Arc<Mutex<()>>>>,
}

impl ShowingLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `showing_id`.
    ///
    /// The returned guard releases the lock when dropped.
    pub async fn lock(&self, showing_id: ShowingId) -> OwnedMutexGuard<()> {
        let lock = self.entry(showing_id).await;
        lock.lock_owned().await
    }

    /// Drops the entry for `showing_id` if no guard or waiter holds it.
    ///
    /// Returns `true` if an entry was removed. A caller that races with the
    /// removal simply allocates a fresh lock; nobody can be holding the old
    /// one at that point.
    pub async fn release(&self, showing_id: ShowingId) -> bool {
        let mut map = self.locks.write().await;
        let idle = map
            .get(&showing_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            map.remove(&showing_id);
        }
        idle
    }

    /// Returns the number of showings that have a lock allocated.
    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }

    /// Returns `true` if no lock has been allocated yet.
    pub async fn is_empty(&self) -> bool {
        self.locks.read().await.is_empty()
    }

    async fn entry(&self, showing_id: ShowingId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(&showing_id) {
            return Arc::clone(lock);
        }
        let mut map = self.locks.write().await;
        Arc::clone(map.entry(showing_id).or_default())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_showing_is_serialized() {
        let locks = ShowingLocks::new();
        let guard = locks.lock(ShowingId::new(1)).await;

        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock(ShowingId::new(1)));
        assert!(second.await.is_err(), "second lock should wait");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.lock(ShowingId::new(1)));
        assert!(third.await.is_ok());
    }

    #[tokio::test]
    async fn different_showings_do_not_block() {
        let locks = ShowingLocks::new();
        let _a = locks.lock(ShowingId::new(1)).await;

        let b = tokio::time::timeout(Duration::from_millis(50), locks.lock(ShowingId::new(2)));
        assert!(b.await.is_ok());
        assert_eq!(locks.len().await, 2);
    }

    #[tokio::test]
    async fn idle_entry_is_released() {
        let locks = ShowingLocks::new();
        drop(locks.lock(ShowingId::new(4)).await);
        assert!(locks.release(ShowingId::new(4)).await);
        assert!(locks.is_empty().await);
        assert!(!locks.release(ShowingId::new(4)).await);
    }

    #[tokio::test]
    async fn held_entry_is_kept() {
        let locks = ShowingLocks::new();
        let guard = locks.lock(ShowingId::new(4)).await;
        assert!(!locks.release(ShowingId::new(4)).await);
        assert_eq!(locks.len().await, 1);

        drop(guard);
        assert!(locks.release(ShowingId::new(4)).await);
    }

    #[tokio::test]
    async fn entries_are_reused() {
        let locks = ShowingLocks::new();
        assert!(locks.is_empty().await);
        drop(locks.lock(ShowingId::new(9)).await);
        drop(locks.lock(ShowingId::new(9)).await);
        assert_eq!(locks.len().await, 1);
    }
}
