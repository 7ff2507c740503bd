//! Power score - the single scalar used for leaderboards and matchmaking.
//!
//! ```text
//! score = level × 1,000,000 + qi × 100 + attack × 10 + defense × 8
//!       + max_health × 5 + agility × 3 + critical × 20 + currency
//!       + realm bonus + path bonus              (minimum 100)
//! ```
//!
//! Independent of combat: it reads a snapshot and its derived stats.

use crate::character::CharacterSnapshot;
use crate::stats::{BaseCombatStats, CultivationPath};

/// Flat bonus granted once a character reaches `min_level`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealmBonus {
    pub name: String,
    pub min_level: u32,
    pub bonus: u64,
}

impl RealmBonus {
    pub fn new(name: impl Into<String>, min_level: u32, bonus: u64) -> Self {
        Self {
            name: name.into(),
            min_level,
            bonus,
        }
    }
}

/// Weights and bonus tables for [`compute_power_score`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PowerTable {
    pub level_weight: u64,
    pub qi_weight: u64,
    pub attack_weight: u64,
    pub defense_weight: u64,
    pub health_weight: u64,
    pub agility_weight: u64,
    pub critical_weight: u64,
    pub currency_weight: u64,
    pub minimum: u64,
    /// Need not be sorted; the highest threshold at or below the level wins.
    pub realms: Vec<RealmBonus>,
    pub qi_path_bonus: u64,
    pub body_path_bonus: u64,
    pub demon_path_bonus: u64,
}

impl PowerTable {
    pub const MIN_SCORE: u64 = 100;

    /// Realm the given level has reached, if any.
    pub fn realm_for(&self, level: u32) -> Option<&RealmBonus> {
        self.realms
            .iter()
            .filter(|realm| realm.min_level <= level)
            .max_by_key(|realm| realm.min_level)
    }

    pub fn path_bonus(&self, path: CultivationPath) -> u64 {
        match path {
            CultivationPath::Qi => self.qi_path_bonus,
            CultivationPath::Body => self.body_path_bonus,
            CultivationPath::Demon => self.demon_path_bonus,
        }
    }
}

impl Default for PowerTable {
    fn default() -> Self {
        Self {
            level_weight: 1_000_000,
            qi_weight: 100,
            attack_weight: 10,
            defense_weight: 8,
            health_weight: 5,
            agility_weight: 3,
            critical_weight: 20,
            currency_weight: 1,
            minimum: Self::MIN_SCORE,
            realms: vec![
                RealmBonus::new("mortal", 1, 0),
                RealmBonus::new("qi_condensation", 10, 50_000),
                RealmBonus::new("foundation_establishment", 20, 150_000),
                RealmBonus::new("core_formation", 35, 400_000),
                RealmBonus::new("nascent_soul", 50, 1_000_000),
            ],
            qi_path_bonus: 0,
            body_path_bonus: 2_500,
            demon_path_bonus: 2_500,
        }
    }
}

/// Compute the aggregate power score. Saturates instead of overflowing.
pub fn compute_power_score(
    character: &CharacterSnapshot,
    stats: &BaseCombatStats,
    table: &PowerTable,
) -> u64 {
    let terms = [
        u64::from(character.level).saturating_mul(table.level_weight),
        character.qi.saturating_mul(table.qi_weight),
        u64::from(stats.attack).saturating_mul(table.attack_weight),
        u64::from(stats.defense).saturating_mul(table.defense_weight),
        u64::from(stats.max_health).saturating_mul(table.health_weight),
        u64::from(stats.agility).saturating_mul(table.agility_weight),
        u64::from(stats.rates.critical).saturating_mul(table.critical_weight),
        character.currency.saturating_mul(table.currency_weight),
        table.realm_for(character.level).map_or(0, |realm| realm.bonus),
        table.path_bonus(character.path),
    ];

    terms
        .into_iter()
        .fold(0u64, u64::saturating_add)
        .max(table.minimum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{SkillRates, StatTable};

    fn flat_stats() -> BaseCombatStats {
        BaseCombatStats {
            max_health: 100,
            max_stamina: 50,
            attack: 10,
            defense: 5,
            agility: 5,
            rates: SkillRates::NONE.with_critical(10),
        }
    }

    #[test]
    fn weighted_sum_at_level_one() {
        let hero = CharacterSnapshot::new("c", "C", 1).with_qi(3).with_currency(7);
        let score = compute_power_score(&hero, &flat_stats(), &PowerTable::default());
        // 1e6 + 300 + 100 + 40 + 500 + 15 + 200 + 7 + mortal 0 + qi path 0
        assert_eq!(score, 1_001_162);
    }

    #[test]
    fn highest_reached_realm_applies() {
        let table = PowerTable::default();
        assert_eq!(table.realm_for(9).map(|r| r.name.as_str()), Some("mortal"));
        assert_eq!(
            table.realm_for(34).map(|r| r.name.as_str()),
            Some("foundation_establishment")
        );
        assert!(table.realm_for(0).is_none());
    }

    #[test]
    fn score_has_a_floor() {
        let table = PowerTable {
            level_weight: 0,
            ..PowerTable::default()
        };
        let zero = BaseCombatStats {
            max_health: 0,
            max_stamina: 0,
            attack: 0,
            defense: 0,
            agility: 0,
            rates: SkillRates::NONE,
        };
        let nobody = CharacterSnapshot::new("n", "N", 0);
        assert_eq!(compute_power_score(&nobody, &zero, &table), PowerTable::MIN_SCORE);
    }

    #[test]
    fn higher_level_never_scores_lower() {
        let table = PowerTable::default();
        let stats = StatTable::default();
        let mut previous = 0;
        for level in 1..60 {
            let hero = CharacterSnapshot::new("c", "C", level).with_path(CultivationPath::Demon);
            let base = hero.base_stats(&stats).expect("valid level");
            let score = compute_power_score(&hero, &base, &table);
            assert!(score > previous);
            previous = score;
        }
    }
}
