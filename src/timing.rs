//! Wall-clock marks around the timed region.

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockMark(Instant);

impl ClockMark {
    pub fn now() -> Self {
        ClockMark(Instant::now())
    }
}

/// Seconds elapsed from `begin` to `end`, 0 if `end` is earlier.
pub fn diff_sec(begin: &ClockMark, end: &ClockMark) -> f64 {
    end.0.saturating_duration_since(begin.0).as_secs_f64()
}
