//! Snapshot publication for candidate routers.
//!
//! # Responsibilities
//! - Hold the current router list as an immutable snapshot
//! - Replace it atomically on refresh
//!
//! Readers call `load()` once per request and match against that snapshot
//! for the whole request; a concurrent `publish` never affects them.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::model::RouterAvail;
use crate::observability::metrics;

/// One published generation of the router list.
#[derive(Debug, Default)]
pub struct Snapshot {
    /// Incremented on every publish; 0 is the initial empty snapshot.
    pub generation: u64,
    pub routers: Arc<Vec<RouterAvail>>,
}

/// Holds the current snapshot.
#[derive(Debug)]
pub struct AvailabilityStore {
    current: ArcSwap<Snapshot>,
}

impl AvailabilityStore {
    /// Create a store with an empty generation-0 snapshot.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::default()),
        }
    }

    /// Create a store already holding `routers` as generation 1.
    pub fn with_routers(routers: Vec<RouterAvail>) -> Self {
        let store = Self::new();
        store.publish(routers);
        store
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Replace the snapshot; returns the new generation.
    pub fn publish(&self, routers: Vec<RouterAvail>) -> u64 {
        self.publish_shared(Arc::new(routers))
    }

    /// Replace the snapshot with an already shared list.
    ///
    /// `rcu` may retry under contention; a retry only clones the `Arc`.
    pub fn publish_shared(&self, routers: Arc<Vec<RouterAvail>>) -> u64 {
        let count = routers.len();
        let previous = self.current.rcu(|prev| Snapshot {
            generation: prev.generation + 1,
            routers: Arc::clone(&routers),
        });
        let generation = previous.generation + 1;

        metrics::record_snapshot(count);
        tracing::info!(generation, routers = count, "Published router snapshot");
        generation
    }
}

impl Default for AvailabilityStore {
    fn default() -> Self {
        Self::new()
    }
}
