//! Fixed ban-duration vocabulary
//!
//! The duration choices presented by ban menus and the CLI. Configuration
//! data only; the registry itself accepts any non-negative second count.

/// Duration choices in seconds, paired with their display labels.
/// `0` is the permanent sentinel.
pub const BAN_DURATIONS: &[(u64, &str)] = &[
    (0, "permanently"),
    (5 * 60, "5 minutes"),
    (15 * 60, "15 minutes"),
    (30 * 60, "30 minutes"),
    (60 * 60, "1 hour"),
    (3 * 60 * 60, "3 hours"),
    (6 * 60 * 60, "6 hours"),
    (12 * 60 * 60, "12 hours"),
    (24 * 60 * 60, "1 day"),
    (3 * 24 * 60 * 60, "3 days"),
    (7 * 24 * 60 * 60, "7 days"),
];

/// Label for a duration, if it is one of the fixed choices
#[must_use]
pub fn duration_label(seconds: u64) -> Option<&'static str> {
    BAN_DURATIONS
        .iter()
        .find(|(secs, _)| *secs == seconds)
        .map(|(_, label)| *label)
}
