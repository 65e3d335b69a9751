//! The ban registry
//!
//! `BanRegistry` owns the ban table, both recency trackers, and the state
//! file. One mutex guards the whole state, so every operation sees and leaves
//! a consistent snapshot of the table and trackers together; `save` clones
//! the snapshot under the lock and does its file I/O outside it.
//!
//! Queries use lazy expiry: a timed record whose expiry has passed reports
//! not-banned immediately, even though it stays in the table until the next
//! `cleanup` physically removes it.

use crate::registry::{
    BanRecord, Clock, RegistryError, RegistryResult, RegistryState, StateFile, SystemClock,
    TrackedEntry,
};
use crate::{PERSIST_TARGET, REGISTRY_TARGET};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Persistent registry of CT bans plus leaver/freekiller tracking
#[derive(Clone)]
pub struct BanRegistry {
    state: Arc<Mutex<RegistryState>>,
    path: Arc<PathBuf>,
    clock: Arc<dyn Clock>,
    // Serializes the write+rename phase of `save` across clones, so a rename
    // always promotes the file this call wrote.
    io_lock: Arc<tokio::sync::Mutex<()>>,
}

impl BanRegistry {
    /// Create an empty registry backed by `path`, without touching disk
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    /// Create an empty registry with an injected clock
    #[must_use]
    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState::new())),
            path: Arc::new(path.into()),
            clock,
            io_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Load the registry from `path`.
    ///
    /// A missing file is not an error; it yields an empty registry. An
    /// unreadable or unparsable file is surfaced so startup logic can decide
    /// between aborting and starting fresh.
    pub async fn load(path: impl Into<PathBuf>) -> RegistryResult<Self> {
        Self::load_with_clock(path, Arc::new(SystemClock)).await
    }

    /// Load with an injected clock
    pub async fn load_with_clock(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> RegistryResult<Self> {
        let path = path.into();

        let state = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let file: StateFile = serde_yaml::from_str(&contents).map_err(|source| {
                    RegistryError::CorruptState {
                        path: path.clone(),
                        source,
                    }
                })?;
                file.into_state()?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(target: PERSIST_TARGET, path = %path.display(), "No state file yet, starting empty");
                RegistryState::new()
            }
            Err(source) => return Err(RegistryError::Persistence { path, source }),
        };

        info!(
            target: PERSIST_TARGET,
            path = %path.display(),
            bans = state.bans.len(),
            leavers = state.leavers.len(),
            freekillers = state.freekillers.len(),
            "Registry state loaded"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            path: Arc::new(path),
            clock,
            io_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Atomically persist the full current state.
    ///
    /// Writes to a sibling temp file and renames over the target, so a crash
    /// mid-write never truncates a previously valid file. Parent directories
    /// are created as needed.
    pub async fn save(&self) -> RegistryResult<()> {
        // Saves across clones share one temp path; holding the I/O lock from
        // snapshot through rename keeps each on-disk file fully formed and
        // makes the last snapshot win.
        let _io = self.io_lock.lock().await;

        let file = StateFile::from_state(&self.state());

        let yaml = serde_yaml::to_string(&file).map_err(|source| RegistryError::Persistence {
            path: self.path.as_ref().clone(),
            source: std::io::Error::other(source),
        })?;

        let path = self.path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| RegistryError::Persistence {
                        path: path.clone(),
                        source,
                    })?;
            }
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, yaml)
            .await
            .map_err(|source| RegistryError::Persistence {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|source| RegistryError::Persistence {
                path: path.clone(),
                source,
            })?;

        debug!(
            target: PERSIST_TARGET,
            path = %path.display(),
            bans = file.bans.len(),
            "Registry state saved"
        );
        Ok(())
    }

    /// Record a ban for `identity`; `duration_secs == 0` means permanent.
    ///
    /// Re-banning an already banned identity resets the expiry and display
    /// name. The identity is dropped from both trackers, since a banned
    /// player is no longer a menu candidate. Moving the player off the team
    /// is the session manager's job, not the registry's.
    pub async fn add_ban(
        &self,
        identity: impl Into<String>,
        duration_secs: u64,
        display_name: impl Into<String>,
    ) {
        let identity = identity.into();
        let display_name = display_name.into();
        let record = BanRecord::new(&identity, duration_secs, &display_name, self.clock.now());

        {
            let mut state = self.state();
            let replaced = state.bans.insert(identity.clone(), record).is_some();
            state.leavers.remove(&identity);
            state.freekillers.remove(&identity);

            info!(
                target: REGISTRY_TARGET,
                identity = %identity,
                display_name = %display_name,
                duration_secs,
                replaced,
                "Ban recorded"
            );
        }

        self.persist_after_mutation("add_ban").await;
    }

    /// Whether `identity` is currently banned.
    ///
    /// Lazy expiry: an expired-but-not-yet-cleaned record reports false.
    #[must_use]
    pub fn is_banned(&self, identity: &str) -> bool {
        let now = self.clock.now();
        self.state()
            .bans
            .get(identity)
            .is_some_and(|record| record.is_active(now))
    }

    /// Remove any ban for `identity`, returning the prior record.
    ///
    /// Idempotent: unbanning a non-banned identity returns `None` and is not
    /// an error.
    pub async fn remove_ban(&self, identity: &str) -> Option<BanRecord> {
        let removed = self.state().bans.remove(identity);

        match &removed {
            Some(record) => {
                info!(
                    target: REGISTRY_TARGET,
                    identity = %identity,
                    display_name = %record.display_name,
                    "Ban removed"
                );
                self.persist_after_mutation("remove_ban").await;
            }
            None => {
                debug!(target: REGISTRY_TARGET, identity = %identity, "Unban for identity with no ban");
            }
        }

        removed
    }

    /// Remove every timed record whose expiry has passed, then persist.
    ///
    /// Permanent records are never touched. Always saves, even when nothing
    /// was removed. Meant for a coarse trigger such as level end; queries
    /// stay correct between cleanups via lazy expiry. Returns the number of
    /// records removed.
    pub async fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let removed = {
            let mut state = self.state();
            let before = state.bans.len();
            state.bans.retain(|_, record| !record.is_expired(now));
            before - state.bans.len()
        };

        info!(target: REGISTRY_TARGET, removed, "Cleanup pass completed");
        self.persist_after_mutation("cleanup").await;
        removed
    }

    /// Track a recently disconnected player for the ban-leaver menu.
    ///
    /// Suppressed entirely while the identity is banned; re-tracking an
    /// already tracked identity is a no-op.
    pub fn track_leaver(&self, identity: impl Into<String>, display_name: impl Into<String>) {
        let identity = identity.into();
        let now = self.clock.now();

        let mut state = self.state();
        if state
            .bans
            .get(&identity)
            .is_some_and(|record| record.is_active(now))
        {
            debug!(target: REGISTRY_TARGET, identity = %identity, "Not tracking banned leaver");
            return;
        }

        state.leavers.insert(identity, display_name.into());
    }

    /// Track a freekiller for the ban-freekiller menu; same rules as
    /// [`Self::track_leaver`].
    pub fn track_freekiller(&self, identity: impl Into<String>, display_name: impl Into<String>) {
        let identity = identity.into();
        let now = self.clock.now();

        let mut state = self.state();
        if state
            .bans
            .get(&identity)
            .is_some_and(|record| record.is_active(now))
        {
            debug!(target: REGISTRY_TARGET, identity = %identity, "Not tracking banned freekiller");
            return;
        }

        state.freekillers.insert(identity, display_name.into());
    }

    /// All current records, including any not-yet-cleaned expired ones.
    /// Ordering is unspecified; sorting for display is the caller's job.
    #[must_use]
    pub fn list_bans(&self) -> Vec<BanRecord> {
        self.state().bans.values().cloned().collect()
    }

    /// Tracked leavers, oldest first
    #[must_use]
    pub fn list_leavers(&self) -> Vec<TrackedEntry> {
        self.state().leavers.entries()
    }

    /// Tracked freekillers, oldest first
    #[must_use]
    pub fn list_freekillers(&self) -> Vec<TrackedEntry> {
        self.state().freekillers.entries()
    }

    /// Path of the backing state file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        // A panic mid-operation leaves no torn state worth refusing: keep
        // serving the last consistent snapshot.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn persist_after_mutation(&self, operation: &str) {
        if let Err(error) = self.save().await {
            warn!(
                target: PERSIST_TARGET,
                operation,
                error = %error,
                "State save failed; in-memory state remains authoritative"
            );
        }
    }
}

impl std::fmt::Debug for BanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("BanRegistry")
            .field("path", &self.path)
            .field("bans", &state.bans.len())
            .field("leavers", &state.leavers.len())
            .field("freekillers", &state.freekillers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::clock::testing::ManualClock;
    use crate::registry::BanExpiry;
    use chrono::Utc;

    fn temp_db_path() -> PathBuf {
        std::env::temp_dir()
            .join("ctban-tests")
            .join(format!("{}.db", uuid::Uuid::new_v4()))
    }

    fn registry_with_manual_clock() -> (BanRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let registry = BanRegistry::with_clock(temp_db_path(), clock.clone());
        (registry, clock)
    }

    #[tokio::test]
    async fn test_ban_query_round_trip() {
        let (registry, clock) = registry_with_manual_clock();

        registry.add_ban("STEAM_0:1:111", 300, "griefer").await;
        assert!(registry.is_banned("STEAM_0:1:111"));

        clock.advance(299);
        assert!(registry.is_banned("STEAM_0:1:111"));

        // Past the duration the query flips without any cleanup, but the
        // record is still physically present.
        clock.advance(1);
        assert!(!registry.is_banned("STEAM_0:1:111"));
        assert_eq!(registry.list_bans().len(), 1);
    }

    #[tokio::test]
    async fn test_permanent_ban_never_expires() {
        let (registry, clock) = registry_with_manual_clock();

        registry.add_ban("STEAM_0:1:111", 0, "griefer").await;
        assert!(registry.is_banned("STEAM_0:1:111"));

        clock.advance(60 * 60 * 24 * 365 * 100);
        assert!(registry.is_banned("STEAM_0:1:111"));
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_expired() {
        let (registry, clock) = registry_with_manual_clock();

        registry.add_ban("permanent", 0, "lifer").await;
        registry.add_ban("timed", 60, "shortimer").await;

        clock.advance(61);
        let removed = registry.cleanup().await;
        assert_eq!(removed, 1);

        let bans = registry.list_bans();
        assert_eq!(bans.len(), 1);
        assert_eq!(bans[0].identity, "permanent");
        assert_eq!(bans[0].expiry, BanExpiry::Permanent);

        // Cleanup always persists, even with nothing to remove
        let removed = registry.cleanup().await;
        assert_eq!(removed, 0);
        assert!(registry.path().exists());
    }

    #[tokio::test]
    async fn test_unban_idempotence() {
        let (registry, _clock) = registry_with_manual_clock();

        assert!(registry.remove_ban("nobody").await.is_none());

        registry.add_ban("STEAM_0:1:111", 300, "griefer").await;
        let removed = registry.remove_ban("STEAM_0:1:111").await;
        assert_eq!(removed.map(|r| r.display_name), Some("griefer".to_string()));

        assert!(registry.remove_ban("STEAM_0:1:111").await.is_none());
        assert!(!registry.is_banned("STEAM_0:1:111"));
    }

    #[tokio::test]
    async fn test_tracking_suppressed_while_banned() {
        let (registry, clock) = registry_with_manual_clock();

        registry.add_ban("STEAM_0:1:111", 300, "griefer").await;
        registry.track_leaver("STEAM_0:1:111", "griefer");
        registry.track_freekiller("STEAM_0:1:111", "griefer");
        assert!(registry.list_leavers().is_empty());
        assert!(registry.list_freekillers().is_empty());

        // Once the ban lapses, tracking applies again
        clock.advance(301);
        registry.track_leaver("STEAM_0:1:111", "griefer");
        assert_eq!(registry.list_leavers().len(), 1);
    }

    #[tokio::test]
    async fn test_bounded_fifo_tracking() {
        let (registry, _clock) = registry_with_manual_clock();

        for i in 0..7 {
            registry.track_leaver(format!("id-{i}"), format!("name-{i}"));
        }

        let identities: Vec<_> = registry
            .list_leavers()
            .into_iter()
            .map(|entry| entry.identity)
            .collect();
        assert_eq!(identities, vec!["id-2", "id-3", "id-4", "id-5", "id-6"]);

        // Re-inserting a tracked identity changes neither order nor size
        registry.track_leaver("id-4", "name-4");
        let again: Vec<_> = registry
            .list_leavers()
            .into_iter()
            .map(|entry| entry.identity)
            .collect();
        assert_eq!(again, identities);
    }

    #[tokio::test]
    async fn test_reban_resets_expiry_and_purges_trackers() {
        let (registry, clock) = registry_with_manual_clock();

        registry.track_leaver("STEAM_0:1:111", "griefer");
        registry.track_freekiller("STEAM_0:1:111", "griefer");
        assert_eq!(registry.list_leavers().len(), 1);

        registry.add_ban("STEAM_0:1:111", 300, "griefer").await;
        assert!(registry.list_leavers().is_empty());
        assert!(registry.list_freekillers().is_empty());

        clock.advance(200);
        registry.add_ban("STEAM_0:1:111", 300, "griefer v2").await;

        // Expiry was reset by the second ban
        clock.advance(200);
        assert!(registry.is_banned("STEAM_0:1:111"));
        clock.advance(101);
        assert!(!registry.is_banned("STEAM_0:1:111"));

        let bans = registry.list_bans();
        assert_eq!(bans.len(), 1);
        assert_eq!(bans[0].display_name, "griefer v2");
    }

    #[tokio::test]
    async fn test_save_failure_keeps_memory_authoritative() {
        // A path whose parent cannot be created: saves fail, mutations stand.
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let registry = BanRegistry::with_clock("/dev/null/ctban/bans.db", clock);

        registry.add_ban("STEAM_0:1:111", 0, "griefer").await;
        assert!(registry.is_banned("STEAM_0:1:111"));
        assert!(registry.save().await.is_err());
        assert!(registry.is_banned("STEAM_0:1:111"));
    }
}
