//! Bounded recency trackers
//!
//! The registry keeps two of these: recently-disconnected players and recent
//! freekillers. Both are small FIFO sequences used to pre-populate
//! ban-selection menus, so ordering is insertion order and duplicates are
//! dropped rather than moved to the front.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One tracked player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    pub identity: String,
    pub display_name: String,
}

/// A fixed-capacity, deduplicated FIFO of tracked players
#[derive(Debug, Clone)]
pub struct RecencyTracker {
    entries: VecDeque<TrackedEntry>,
    capacity: usize,
}

impl RecencyTracker {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry unless its identity is already tracked.
    ///
    /// Re-inserting a tracked identity is a no-op (no reordering). When the
    /// tracker is full, the oldest entry is evicted first. Returns whether
    /// the entry was inserted.
    pub fn insert(&mut self, identity: impl Into<String>, display_name: impl Into<String>) -> bool {
        let identity = identity.into();
        if self.contains(&identity) {
            return false;
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }

        self.entries.push_back(TrackedEntry {
            identity,
            display_name: display_name.into(),
        });
        true
    }

    /// Drop any entry for `identity`; used when the player gets banned
    pub fn remove(&mut self, identity: &str) {
        self.entries.retain(|entry| entry.identity != identity);
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.entries.iter().any(|entry| entry.identity == identity)
    }

    /// Snapshot in insertion order, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<TrackedEntry> {
        self.entries.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rebuild from persisted entries, truncating anything beyond capacity
    pub fn from_entries(capacity: usize, entries: Vec<TrackedEntry>) -> Self {
        let mut tracker = Self::new(capacity);
        for entry in entries {
            tracker.insert(entry.identity, entry.display_name);
        }
        tracker
    }
}
