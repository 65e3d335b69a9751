//! Ban record and expiry lifecycle
//!
//! A record is created either permanent or timed. Timed records become
//! logically expired the moment the clock reaches their expiry; they stay in
//! the table until the next cleanup physically removes them, and queries must
//! treat them as absent in the meantime.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// When a ban stops applying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BanExpiry {
    /// Never expires until explicitly unbanned
    Permanent,
    /// Expires once the clock reaches this instant
    At(DateTime<Utc>),
}

impl std::fmt::Display for BanExpiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::At(at) => write!(f, "until {}", at.to_rfc3339()),
        }
    }
}

/// A single ban, keyed by the player's stable identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    /// Stable identifier for the player (unique key in the ban table)
    pub identity: String,
    /// When the ban stops applying
    pub expiry: BanExpiry,
    /// Last known name, kept for display only
    pub display_name: String,
}

impl BanRecord {
    /// Create a record expiring `duration_secs` from `now`; `0` means permanent
    pub fn new(
        identity: impl Into<String>,
        duration_secs: u64,
        display_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let expiry = if duration_secs == 0 {
            BanExpiry::Permanent
        } else {
            let at = i64::try_from(duration_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|delta| now.checked_add_signed(delta));
            match at {
                Some(at) => BanExpiry::At(at),
                // A duration past the representable range never lapses anyway
                None => BanExpiry::Permanent,
            }
        };

        Self {
            identity: identity.into(),
            expiry,
            display_name: display_name.into(),
        }
    }

    /// Whether the ban still applies at `now`
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            BanExpiry::Permanent => true,
            BanExpiry::At(at) => now < at,
        }
    }

    /// Whether the record is due for physical removal at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            BanExpiry::Permanent => false,
            BanExpiry::At(at) => now >= at,
        }
    }
}
