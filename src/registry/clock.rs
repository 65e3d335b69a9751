//! Clock abstraction for expiry checks
//!
//! Ban expiry is always evaluated against an injected clock so the lifecycle
//! can be exercised with simulated time instead of sleeping in tests.

use chrono::{DateTime, Utc};

/// Source of the current time for expiry decisions
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used outside of tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_tracks_utc() {
        let clock = SystemClock;
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_mock_clock() {
        let mut clock = MockClock::new();
        let frozen = Utc::now();
        clock.expect_now().return_const(frozen);
        assert_eq!(clock.now(), frozen);
        assert_eq!(clock.now(), frozen);
    }
}
