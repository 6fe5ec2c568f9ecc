//! Claim/release work queue seam.
//!
//! The host platform owns the durable queue; this trait captures the surface
//! the refresh workflow consumes. The in-memory implementation delivers
//! items in enqueue order and leases claimed items for a fixed duration;
//! a claim that is neither deleted nor released becomes claimable again
//! once its lease expires, in its original queue position, giving
//! at-least-once delivery without reordering.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

/// A queue item handed to a worker. Holding a `ClaimedItem` leases the
/// underlying entry; the worker must either delete it (done) or release it
/// (retry).
#[derive(Clone, Debug, PartialEq)]
pub struct ClaimedItem {
    /// Queue-assigned item identifier.
    pub item_id: u64,
    /// Opaque payload supplied at enqueue time.
    pub data: Value,
}

/// Shared trait implemented by queue backends.
pub trait Queue: Send + Sync {
    /// Enqueue a payload, returning the assigned item id.
    fn create_item(&self, data: Value) -> u64;

    /// Claim the oldest unleased item, or `None` when nothing is claimable.
    fn claim_item(&self) -> Option<ClaimedItem>;

    /// Remove a processed item. Returns `false` when the item is gone.
    fn delete_item(&self, item: &ClaimedItem) -> bool;

    /// Return a claimed item to the queue for redelivery. Returns `false`
    /// when the item is gone.
    fn release_item(&self, item: &ClaimedItem) -> bool;
}

struct QueuedItem {
    item_id: u64,
    data: Value,
    leased_until: Option<Instant>,
}

#[derive(Default)]
struct QueueState {
    next_item_id: u64,
    items: VecDeque<QueuedItem>,
}

/// In-memory FIFO queue with lease-based redelivery.
pub struct InMemoryQueue {
    state: Mutex<QueueState>,
    lease: Duration,
}

/// Lease duration used by `InMemoryQueue::new`.
pub const DEFAULT_LEASE: Duration = Duration::from_secs(30);

impl InMemoryQueue {
    /// Create a queue with the default lease duration.
    pub fn new() -> Self {
        Self::with_lease(DEFAULT_LEASE)
    }

    /// Create a queue whose claims expire after `lease`.
    pub fn with_lease(lease: Duration) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            lease,
        }
    }

    /// Number of items currently in the queue, leased or not.
    pub fn len(&self) -> usize {
        self.state.lock().expect("queue lock poisoned").items.len()
    }

    /// Returns `true` when the queue holds no items at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue for InMemoryQueue {
    fn create_item(&self, data: Value) -> u64 {
        let mut state = self.state.lock().expect("queue lock poisoned");
        state.next_item_id += 1;
        let item_id = state.next_item_id;
        state.items.push_back(QueuedItem {
            item_id,
            data,
            leased_until: None,
        });
        debug!(item_id, "Enqueued queue item");
        item_id
    }

    fn claim_item(&self) -> Option<ClaimedItem> {
        let mut state = self.state.lock().expect("queue lock poisoned");
        let now = Instant::now();

        // Items stay in place while leased, so expiring a lease restores the
        // item at its original position.
        for item in state.items.iter_mut() {
            if item.leased_until.is_some_and(|deadline| deadline <= now) {
                debug!(item_id = item.item_id, "Queue lease expired; item claimable again");
                item.leased_until = None;
            }
        }

        let claimable = state.items.iter_mut().find(|item| item.leased_until.is_none())?;
        claimable.leased_until = Some(now + self.lease);
        debug!(item_id = claimable.item_id, "Claimed queue item");
        Some(ClaimedItem {
            item_id: claimable.item_id,
            data: claimable.data.clone(),
        })
    }

    fn delete_item(&self, item: &ClaimedItem) -> bool {
        let mut state = self.state.lock().expect("queue lock poisoned");
        let before = state.items.len();
        state.items.retain(|queued| queued.item_id != item.item_id);
        state.items.len() != before
    }

    fn release_item(&self, item: &ClaimedItem) -> bool {
        let mut state = self.state.lock().expect("queue lock poisoned");
        match state.items.iter_mut().find(|queued| queued.item_id == item.item_id) {
            Some(queued) => {
                queued.leased_until = None;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claims_follow_enqueue_order() {
        let queue = InMemoryQueue::new();
        let first = queue.create_item(json!({"batch": 1}));
        let second = queue.create_item(json!({"batch": 2}));

        assert_eq!(queue.claim_item().expect("first claim").item_id, first);
        assert_eq!(queue.claim_item().expect("second claim").item_id, second);
        assert!(queue.claim_item().is_none());
    }

    #[test]
    fn deleted_items_never_redeliver() {
        let queue = InMemoryQueue::new();
        queue.create_item(json!(1));
        let item = queue.claim_item().expect("claim");

        assert!(queue.delete_item(&item));
        assert!(!queue.delete_item(&item));
        assert!(queue.claim_item().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn released_items_redeliver_immediately() {
        let queue = InMemoryQueue::new();
        let id = queue.create_item(json!(1));
        let item = queue.claim_item().expect("claim");

        assert!(queue.release_item(&item));
        assert_eq!(queue.claim_item().expect("reclaim").item_id, id);
    }

    #[test]
    fn expired_leases_redeliver_in_original_order() {
        let queue = InMemoryQueue::with_lease(Duration::ZERO);
        let first = queue.create_item(json!(1));
        let second = queue.create_item(json!(2));

        // The zero-length lease expires instantly, so an abandoned claim
        // comes back before anything behind it.
        let abandoned = queue.claim_item().expect("claim");
        assert_eq!(abandoned.item_id, first);

        let redelivered = queue.claim_item().expect("redelivery");
        assert_eq!(redelivered.item_id, first);

        assert!(queue.delete_item(&redelivered));
        assert_eq!(queue.claim_item().expect("next claim").item_id, second);
    }

    #[test]
    fn releasing_a_deleted_item_is_false() {
        let queue = InMemoryQueue::new();
        queue.create_item(json!(1));
        let item = queue.claim_item().expect("claim");
        assert!(queue.delete_item(&item));
        assert!(!queue.release_item(&item));
    }
}
