//! Time-based accrual with fractional carry.

use crate::time::Timestamp;

/// Passive resource tracked by its own clock.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    /// Auto-cultivation resource.
    Qi,
    /// Spent on trials; regenerates slowly.
    Energy,
}

/// Accrual speed as an exact ratio: `units` every `per_millis` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccrualRate {
    pub units: u64,
    pub per_millis: u64,
}

impl AccrualRate {
    pub const ZERO: Self = Self {
        units: 0,
        per_millis: 1_000,
    };

    pub const fn per_second(units: u64) -> Self {
        Self {
            units,
            per_millis: 1_000,
        }
    }

    pub const fn per_hour(units: u64) -> Self {
        Self {
            units,
            per_millis: 3_600_000,
        }
    }
}

/// Per-resource accrual parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionRates {
    pub qi_base_per_second: u64,
    /// Every this many levels add one qi per second.
    pub qi_levels_per_step: u32,
    pub qi_capacity: u64,
    pub energy_per_hour: u64,
    pub energy_capacity: u64,
}

impl ProgressionRates {
    /// `qi_per_second = base + level / levels_per_step`.
    pub fn qi_rate(&self, level: u32) -> AccrualRate {
        let step = u64::from(level / self.qi_levels_per_step.max(1));
        AccrualRate::per_second(self.qi_base_per_second.saturating_add(step))
    }

    pub fn energy_rate(&self) -> AccrualRate {
        AccrualRate::per_hour(self.energy_per_hour)
    }

    pub fn rate(&self, kind: ResourceKind, level: u32) -> AccrualRate {
        match kind {
            ResourceKind::Qi => self.qi_rate(level),
            ResourceKind::Energy => self.energy_rate(),
        }
    }

    pub fn capacity(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Qi => self.qi_capacity,
            ResourceKind::Energy => self.energy_capacity,
        }
    }
}

impl Default for ProgressionRates {
    fn default() -> Self {
        Self {
            qi_base_per_second: 1,
            qi_levels_per_step: 10,
            qi_capacity: u64::MAX,
            energy_per_hour: 10,
            energy_capacity: 100,
        }
    }
}

/// Per-(character, resource) accrual bookkeeping.
///
/// `carry` holds the sub-unit remainder in unit-milliseconds, always less
/// than the rate's `per_millis`. `last_accrued` never moves backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionClock {
    pub last_accrued: Timestamp,
    #[cfg_attr(feature = "serde", serde(default))]
    pub carry: u64,
    /// Accrued but not yet written to storage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unflushed: u64,
    pub last_flush: Timestamp,
}

impl ProgressionClock {
    pub const fn started_at(now: Timestamp) -> Self {
        Self {
            last_accrued: now,
            carry: 0,
            unflushed: 0,
            last_flush: now,
        }
    }

    /// Reset the unflushed counter after a successful write.
    pub fn mark_flushed(&mut self, now: Timestamp) {
        self.unflushed = 0;
        self.last_flush = self.last_flush.max(now);
    }
}

/// Result of one accrual evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Accrual {
    /// New resource amount, never above `capacity` unless `current` already was.
    pub amount: u64,
    /// Units actually credited.
    pub gained: u64,
    pub clock: ProgressionClock,
}

/// Credit the time elapsed since `clock.last_accrued`.
///
/// Elapsed time is clamped to zero on clock skew. The fractional remainder
/// is carried, so evaluating every second and once per minute accrue the
/// same total; it is discarded when the amount hits `capacity`.
pub fn accrue(
    clock: &ProgressionClock,
    rate: AccrualRate,
    capacity: u64,
    current: u64,
    now: Timestamp,
) -> Accrual {
    let mut next = *clock;
    next.last_accrued = clock.last_accrued.max(now);

    if current >= capacity || rate.units == 0 || rate.per_millis == 0 {
        next.carry = 0;
        return Accrual {
            amount: current,
            gained: 0,
            clock: next,
        };
    }

    let elapsed = now.saturating_elapsed_since(clock.last_accrued).as_millis();
    let numerator = elapsed * u128::from(rate.units) + u128::from(clock.carry);
    let per = u128::from(rate.per_millis);
    let whole = u64::try_from(numerator / per).unwrap_or(u64::MAX);

    let room = capacity - current;
    let gained = whole.min(room);
    next.carry = if gained == room {
        0
    } else {
        // Remainder is below `per_millis`, which fits in u64.
        (numerator % per) as u64
    };
    next.unflushed = next.unflushed.saturating_add(gained);

    Accrual {
        amount: current + gained,
        gained,
        clock: next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catch_up_is_capped() {
        let clock = ProgressionClock::started_at(Timestamp::from_secs(100));
        let result = accrue(
            &clock,
            AccrualRate::per_second(5),
            1_000,
            995,
            Timestamp::from_secs(112),
        );
        assert_eq!(result.amount, 1_000);
        assert_eq!(result.gained, 5);
        assert_eq!(result.clock.carry, 0);
        assert_eq!(result.clock.last_accrued, Timestamp::from_secs(112));
    }

    #[test]
    fn zero_elapsed_is_idempotent() {
        let now = Timestamp::from_secs(50);
        let clock = ProgressionClock::started_at(now);
        let once = accrue(&clock, AccrualRate::per_second(3), 500, 10, now);
        let twice = accrue(&once.clock, AccrualRate::per_second(3), 500, once.amount, now);
        assert_eq!(once.amount, 10);
        assert_eq!(twice, once);
    }

    #[test]
    fn fractional_progress_is_carried() {
        // 10 per hour = one unit every 6 minutes.
        let rate = AccrualRate::per_hour(10);
        let mut clock = ProgressionClock::started_at(Timestamp::EPOCH);
        let mut amount = 0;
        for minute in 1..=60 {
            let result = accrue(&clock, rate, 100, amount, Timestamp::from_secs(minute * 60));
            amount = result.amount;
            clock = result.clock;
        }
        assert_eq!(amount, 10);
        assert_eq!(clock.unflushed, 10);
    }

    #[test]
    fn clock_skew_never_rewinds() {
        let clock = ProgressionClock::started_at(Timestamp::from_secs(100));
        let result = accrue(
            &clock,
            AccrualRate::per_second(5),
            1_000,
            10,
            Timestamp::from_secs(90),
        );
        assert_eq!(result.gained, 0);
        assert_eq!(result.amount, 10);
        assert_eq!(result.clock.last_accrued, Timestamp::from_secs(100));
    }

    #[test]
    fn amount_is_monotone_and_bounded() {
        let rate = AccrualRate::per_second(7);
        let mut clock = ProgressionClock::started_at(Timestamp::EPOCH);
        let mut amount = 0;
        for step in [0u64, 400, 1_250, 1_250, 9_999, 60_000, 3_600_000] {
            let result = accrue(&clock, rate, 20_000, amount, Timestamp::from_millis(step));
            assert!(result.amount >= amount);
            assert!(result.amount <= 20_000);
            amount = result.amount;
            clock = result.clock;
        }
        assert_eq!(amount, 20_000);
    }

    #[test]
    fn qi_rate_scales_with_level() {
        let rates = ProgressionRates::default();
        assert_eq!(rates.qi_rate(1), AccrualRate::per_second(1));
        assert_eq!(rates.qi_rate(25), AccrualRate::per_second(3));
        assert_eq!(rates.rate(ResourceKind::Energy, 99), AccrualRate::per_hour(10));
        assert_eq!("ENERGY".parse::<ResourceKind>().ok(), Some(ResourceKind::Energy));
    }
}
