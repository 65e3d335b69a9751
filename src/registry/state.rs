//! In-memory registry state and its on-disk document
//!
//! `RegistryState` is what the registry mutates; `StateFile` is the versioned
//! YAML document that gets written to disk. Keeping them separate lets the
//! file format stay explicit and self-describing instead of mirroring
//! whatever the in-memory representation happens to be.

use crate::registry::{
    BanRecord, RecencyTracker, RegistryError, RegistryResult, TrackedEntry,
    TRACKED_FREEKILLERS, TRACKED_LEAVERS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current on-disk format version
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Everything the registry owns: the ban table plus both trackers
#[derive(Debug, Clone)]
pub struct RegistryState {
    pub bans: HashMap<String, BanRecord>,
    pub leavers: RecencyTracker,
    pub freekillers: RecencyTracker,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            bans: HashMap::new(),
            leavers: RecencyTracker::new(TRACKED_LEAVERS),
            freekillers: RecencyTracker::new(TRACKED_FREEKILLERS),
        }
    }
}

impl RegistryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Versioned on-disk document
#[derive(Debug, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub bans: Vec<BanRecord>,
    pub leavers: Vec<TrackedEntry>,
    pub freekillers: Vec<TrackedEntry>,
}

impl StateFile {
    /// Snapshot the live state into a document
    #[must_use]
    pub fn from_state(state: &RegistryState) -> Self {
        let mut bans: Vec<BanRecord> = state.bans.values().cloned().collect();
        // Stable file contents regardless of hash order
        bans.sort_by(|a, b| a.identity.cmp(&b.identity));

        Self {
            version: STATE_FORMAT_VERSION,
            bans,
            leavers: state.leavers.entries(),
            freekillers: state.freekillers.entries(),
        }
    }

    /// Rebuild live state from a document, rejecting unknown versions
    pub fn into_state(self) -> RegistryResult<RegistryState> {
        if self.version != STATE_FORMAT_VERSION {
            return Err(RegistryError::UnsupportedVersion(self.version));
        }

        let bans = self
            .bans
            .into_iter()
            .map(|record| (record.identity.clone(), record))
            .collect();

        Ok(RegistryState {
            bans,
            leavers: RecencyTracker::from_entries(TRACKED_LEAVERS, self.leavers),
            freekillers: RecencyTracker::from_entries(TRACKED_FREEKILLERS, self.freekillers),
        })
    }
}
