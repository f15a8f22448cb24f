//! Sampling windows for track prediction

use chrono::{DateTime, Duration, Timelike, Utc};

/// Start instant plus a fixed number of one-minute sample instants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    sample_count: u32,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, sample_count: u32) -> Self {
        Self {
            start,
            sample_count,
        }
    }

    /// Window starting at the top of the hour containing `now`
    pub fn aligned_to_hour(now: DateTime<Utc>, sample_count: u32) -> Self {
        let start = now
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_minute(0))
            .unwrap_or(now);
        Self::new(start, sample_count)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Instant of sample `i`
    pub fn instant(&self, i: u32) -> DateTime<Utc> {
        self.start + Duration::minutes(i as i64)
    }

    pub fn instants(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.sample_count).map(|i| self.instant(i))
    }

    /// Instant of the last sample, if there is one
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.sample_count
            .checked_sub(1)
            .map(|last| self.instant(last))
    }
}
