//! Game mechanics: the day clock and the infection-risk model.

mod infection;

pub use infection::*;

/// Length of an in-game day, in minutes.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Split a raw minute count into the time of day and the number of whole days it
/// overflowed by.
///
/// Only overflow rolls over; a negative count is returned untouched so the time
/// stat's own bounds decide what happens to it.
pub fn roll_over_minutes(raw_minutes: i64) -> (i64, i64) {
    if raw_minutes < MINUTES_PER_DAY {
        return (raw_minutes, 0);
    }
    (
        raw_minutes % MINUTES_PER_DAY,
        raw_minutes / MINUTES_PER_DAY,
    )
}

/// Render minutes since midnight as `HH:MM`.
pub fn format_clock(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
