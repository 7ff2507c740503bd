//! Damage calculation and application.
//!
//! All arithmetic is integer; percentages are whole numbers (150 = ×1.5).

// ============================================================================
// Damage Calculation
// ============================================================================

/// Raw damage before variance.
///
/// ```text
/// base = max(minimum, attack - defense)
/// ```
pub fn base_damage(attack: u32, defense: u32, minimum: u32) -> u32 {
    attack.saturating_sub(defense).max(minimum)
}

/// Scale damage by a variance percentage (drawn from `[80, 120]` by default).
pub fn apply_variance(damage: u32, variance_pct: u32, minimum: u32) -> u32 {
    scale_pct(damage, variance_pct).max(minimum)
}

/// Critical hit multiplies damage by `multiplier_pct / 100`.
pub fn apply_critical(damage: u32, multiplier_pct: u32) -> u32 {
    scale_pct(damage, multiplier_pct)
}

/// Extra damage from a multi-strike: every strike after the first adds
/// `extra_strike_pct` percent of the (pre-critical) hit damage.
pub fn multi_strike_bonus(hit_damage: u32, extra_strikes: u32, extra_strike_pct: u32) -> u32 {
    scale_pct(hit_damage, extra_strike_pct).saturating_mul(extra_strikes)
}

/// Counter-attack damage: a reduced hit from the defender back at the actor.
///
/// ```text
/// counter = max(minimum, max(minimum, defender_attack - actor_defense) × pct / 100)
/// ```
pub fn counter_damage(
    defender_attack: u32,
    actor_defense: u32,
    counter_pct: u32,
    minimum: u32,
) -> u32 {
    scale_pct(base_damage(defender_attack, actor_defense, minimum), counter_pct).max(minimum)
}

fn scale_pct(value: u32, pct: u32) -> u32 {
    let scaled = value as u64 * pct as u64 / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_damage_never_below_minimum() {
        assert_eq!(base_damage(20, 10, 1), 10);
        assert_eq!(base_damage(5, 50, 1), 1);
    }

    #[test]
    fn variance_band_for_ten_base() {
        assert_eq!(apply_variance(10, 80, 1), 8);
        assert_eq!(apply_variance(10, 120, 1), 12);
        assert_eq!(apply_variance(1, 80, 1), 1);
    }

    #[test]
    fn critical_and_multi_strike() {
        assert_eq!(apply_critical(10, 150), 15);
        assert_eq!(apply_critical(10, 200), 20);
        // Two extra strikes at 30% of 20 = 12
        assert_eq!(multi_strike_bonus(20, 2, 30), 12);
        assert_eq!(multi_strike_bonus(20, 0, 30), 0);
    }

    #[test]
    fn counter_is_reduced() {
        assert_eq!(counter_damage(40, 0, 50, 1), 20);
        assert_eq!(counter_damage(1, 100, 50, 1), 1);
    }
}
