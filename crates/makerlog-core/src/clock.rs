//! Wall-clock source clamped to never run backwards.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Hands out timestamps that are non-decreasing across calls.
///
/// Timestamps are truncated to whole microseconds. A wall-clock step
/// backwards (NTP adjustment) repeats the last issued instant instead of
/// going back in time.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    /// New clock with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current instant, clamped to the last issued one.
    pub fn now(&self) -> DateTime<Utc> {
        self.at(Utc::now())
    }

    /// Clamp `candidate` against the history and record it.
    pub fn at(&self, candidate: DateTime<Utc>) -> DateTime<Utc> {
        let micros = candidate.timestamp_micros();
        let issued = self.last_micros.fetch_max(micros, Ordering::AcqRel).max(micros);
        DateTime::from_timestamp_micros(issued).unwrap_or(candidate)
    }
}
