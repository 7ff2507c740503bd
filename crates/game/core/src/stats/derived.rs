//! Derived combat stats - level and path in, combat numbers out.
//!
//! Formula, applied per stat with integer arithmetic:
//!
//! ```text
//! stat = floor(per_level × level × path_multiplier% / 100) + floor
//! ```
//!
//! followed by the flat cultivation bonus granted by carried qi. Nothing
//! here is stored: stats are recomputed from the character snapshot at the
//! start of every encounter.

use super::path::{CultivationPath, PathTable};
use super::rates::SkillRates;
use crate::error::{EngineError, Result};

// ============================================================================
// Growth Tables
// ============================================================================

/// Linear growth of one stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatGrowth {
    pub per_level: u32,
    pub floor: u32,
}

impl StatGrowth {
    pub const fn new(per_level: u32, floor: u32) -> Self {
        Self { per_level, floor }
    }

    /// `floor(per_level × level × multiplier / 100) + floor`, saturating.
    pub fn at(&self, level: u32, multiplier_pct: u32) -> u32 {
        let scaled = self.per_level as u64 * level as u64 * multiplier_pct as u64 / 100;
        let total = scaled.saturating_add(self.floor as u64);
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}

/// Flat bonus granted for every `qi_per_point` units of carried qi.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CultivationBonus {
    pub qi_per_point: u64,
    pub health_per_point: u32,
    pub attack_per_point: u32,
    pub defense_per_point: u32,
}

impl CultivationBonus {
    fn points(&self, carried_qi: u64) -> u32 {
        if self.qi_per_point == 0 {
            return 0;
        }
        u32::try_from(carried_qi / self.qi_per_point).unwrap_or(u32::MAX)
    }
}

impl Default for CultivationBonus {
    fn default() -> Self {
        Self {
            qi_per_point: 1_000,
            health_per_point: 10,
            attack_per_point: 1,
            defense_per_point: 1,
        }
    }
}

/// Complete stat model configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatTable {
    pub health: StatGrowth,
    pub stamina: StatGrowth,
    pub attack: StatGrowth,
    pub defense: StatGrowth,
    pub agility: StatGrowth,
    pub paths: PathTable,
    pub cultivation_bonus: CultivationBonus,
}

impl Default for StatTable {
    fn default() -> Self {
        Self {
            health: StatGrowth::new(50, 100),
            stamina: StatGrowth::new(10, 50),
            attack: StatGrowth::new(5, 10),
            defense: StatGrowth::new(3, 5),
            agility: StatGrowth::new(2, 5),
            paths: PathTable::default(),
            cultivation_bonus: CultivationBonus::default(),
        }
    }
}

// ============================================================================
// Derived Stats
// ============================================================================

/// Base combat stats derived from `(level, path, carried qi)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseCombatStats {
    pub max_health: u32,
    pub max_stamina: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    pub rates: SkillRates,
}

impl StatTable {
    /// Derive base combat stats with this table.
    ///
    /// Fails with [`EngineError::InvalidLevel`] when `level < 1`.
    pub fn derive(
        &self,
        level: u32,
        path: CultivationPath,
        carried_qi: u64,
    ) -> Result<BaseCombatStats> {
        if level < 1 {
            return Err(EngineError::InvalidLevel { level });
        }

        let profile = self.paths.profile(path);
        let mult = &profile.multipliers;
        let bonus = &self.cultivation_bonus;
        let points = bonus.points(carried_qi);

        Ok(BaseCombatStats {
            max_health: self
                .health
                .at(level, mult.health)
                .saturating_add(points.saturating_mul(bonus.health_per_point)),
            max_stamina: self.stamina.at(level, mult.stamina),
            attack: self
                .attack
                .at(level, mult.attack)
                .saturating_add(points.saturating_mul(bonus.attack_per_point)),
            defense: self
                .defense
                .at(level, mult.defense)
                .saturating_add(points.saturating_mul(bonus.defense_per_point)),
            agility: self.agility.at(level, mult.agility),
            rates: profile.rates,
        })
    }
}

/// Derive base combat stats using the default [`StatTable`].
pub fn derive_combat_stats(
    level: u32,
    path: CultivationPath,
    carried_qi: u64,
) -> Result<BaseCombatStats> {
    StatTable::default().derive(level, path, carried_qi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_health_at_level_ten() {
        let stats = derive_combat_stats(10, CultivationPath::Body, 0).unwrap();
        // floor(50 × 10 × 1.5) + 100 = 850
        assert_eq!(stats.max_health, 850);
        // floor(3 × 10 × 1.5) + 5 = 50
        assert_eq!(stats.defense, 50);
        // floor(2 × 10 × 0.7) + 5 = 19
        assert_eq!(stats.agility, 19);
    }

    #[test]
    fn demon_is_glass_cannon() {
        let demon = derive_combat_stats(20, CultivationPath::Demon, 0).unwrap();
        let qi = derive_combat_stats(20, CultivationPath::Qi, 0).unwrap();
        // floor(5 × 20 × 1.4) + 10 = 150
        assert_eq!(demon.attack, 150);
        assert_eq!(qi.attack, 110);
        assert!(demon.defense < qi.defense);
        assert!(demon.agility > qi.agility);
    }

    #[test]
    fn derivation_is_pure() {
        for path in [CultivationPath::Qi, CultivationPath::Body, CultivationPath::Demon] {
            let a = derive_combat_stats(37, path, 12_345).unwrap();
            let b = derive_combat_stats(37, path, 12_345).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn carried_qi_grants_flat_bonus() {
        let bare = derive_combat_stats(5, CultivationPath::Qi, 0).unwrap();
        let rich = derive_combat_stats(5, CultivationPath::Qi, 2_999).unwrap();
        assert_eq!(rich.attack, bare.attack + 2);
        assert_eq!(rich.defense, bare.defense + 2);
        assert_eq!(rich.max_health, bare.max_health + 20);
        assert_eq!(rich.max_stamina, bare.max_stamina);
    }

    #[test]
    fn level_zero_is_rejected() {
        let err = derive_combat_stats(0, CultivationPath::Qi, 0).unwrap_err();
        assert_eq!(err, EngineError::InvalidLevel { level: 0 });
    }

    #[test]
    fn rates_come_from_path_not_level() {
        let low = derive_combat_stats(1, CultivationPath::Demon, 0).unwrap();
        let high = derive_combat_stats(90, CultivationPath::Demon, 0).unwrap();
        assert_eq!(low.rates, high.rates);
        assert_eq!(low.rates.critical, 25);
    }
}
