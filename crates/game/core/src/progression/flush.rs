//! When accrued-but-unwritten progress should be persisted.
//!
//! Between flushes progress lives only in memory; a crash loses at most one
//! flush interval (or one threshold's worth of units).

use core::time::Duration;

use super::accrual::ProgressionClock;
use crate::time::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlushPolicy {
    pub interval_secs: u64,
    pub amount_threshold: u64,
}

impl FlushPolicy {
    pub const DEFAULT_INTERVAL_SECS: u64 = 15;
    pub const DEFAULT_AMOUNT_THRESHOLD: u64 = 60;

    pub const fn new(interval_secs: u64, amount_threshold: u64) -> Self {
        Self {
            interval_secs,
            amount_threshold,
        }
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Flush when something is pending and either the interval has passed
    /// since the last flush or the pending amount reached the threshold.
    pub fn should_flush(&self, clock: &ProgressionClock, now: Timestamp) -> bool {
        if clock.unflushed == 0 {
            return false;
        }
        now.saturating_elapsed_since(clock.last_flush) >= self.interval()
            || clock.unflushed >= self.amount_threshold
    }
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL_SECS, Self::DEFAULT_AMOUNT_THRESHOLD)
    }
}
