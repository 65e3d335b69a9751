//! CT-ban registry
//!
//! A small persistent registry of time-bounded bans keyed by stable player
//! identity, plus two bounded recency trackers (recent leavers, recent
//! freekillers) that pre-populate ban-selection menus. Menus, chat commands,
//! and game-event hooks are external collaborators: they call in through
//! [`BanRegistry`] and the registry never calls back out.

pub mod clock;
mod durations;
mod error;
mod record;
mod state;
mod store;
mod tracker;

pub use clock::{Clock, SystemClock};
pub use durations::{duration_label, BAN_DURATIONS};
pub use error::{RegistryError, RegistryResult};
pub use record::{BanExpiry, BanRecord};
pub use state::{RegistryState, StateFile, STATE_FORMAT_VERSION};
pub use store::BanRegistry;
pub use tracker::{RecencyTracker, TrackedEntry};

/// Number of recently disconnected players to keep for the ban-leaver menu
pub const TRACKED_LEAVERS: usize = 5;

/// Number of recent freekillers to keep for the ban-freekiller menu
pub const TRACKED_FREEKILLERS: usize = 5;

/// Default location of the ban database
pub const DEFAULT_DATABASE_PATH: &str = "data/ctban/bans.db";
