//! Trial catalog: fixed PvE encounters.

use std::collections::BTreeMap;
use std::time::Duration;

use cultivation_core::{CombatantState, SkillRates};

/// Stats of the enemy a trial pits the player against.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpec {
    pub name: String,
    pub max_health: u32,
    pub max_stamina: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rates: SkillRates,
}

/// Granted on victory, before server event multipliers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrialRewards {
    pub qi: u64,
    pub currency: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "default_min_level"))]
    pub min_level: u32,
    pub energy_cost: u32,
    pub cooldown_secs: u64,
    pub enemy: EnemySpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: TrialRewards,
}

#[cfg(feature = "serde")]
fn default_min_level() -> u32 {
    1
}

impl TrialTemplate {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Fresh, full-vitals combatant for this trial's enemy.
    pub fn enemy_combatant(&self, trial_id: &str) -> CombatantState {
        let enemy = &self.enemy;
        CombatantState::new(
            format!("trial:{trial_id}"),
            enemy.name.clone(),
            enemy.max_health,
            enemy.max_stamina,
            enemy.attack,
            enemy.defense,
            enemy.agility,
            enemy.rates.clamped(),
        )
    }

    /// Describe the first structural problem, if any.
    pub fn problem(&self) -> Option<&'static str> {
        if self.enemy.max_health == 0 {
            Some("enemy max_health must be non-zero")
        } else if self.enemy.max_stamina == 0 {
            Some("enemy max_stamina must be non-zero")
        } else if self.min_level == 0 {
            Some("min_level must be at least 1")
        } else {
            None
        }
    }
}

/// Trials keyed by id, in id order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrialCatalog {
    trials: BTreeMap<String, TrialTemplate>,
}

impl TrialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, template: TrialTemplate) {
        self.trials.insert(id.into(), template);
    }

    pub fn get(&self, id: &str) -> Option<&TrialTemplate> {
        self.trials.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TrialTemplate)> {
        self.trials.iter().map(|(id, t)| (id.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

impl FromIterator<(String, TrialTemplate)> for TrialCatalog {
    fn from_iter<I: IntoIterator<Item = (String, TrialTemplate)>>(iter: I) -> Self {
        Self {
            trials: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample() -> TrialTemplate {
        TrialTemplate {
            name: "Bandit Camp".into(),
            min_level: 1,
            energy_cost: 10,
            cooldown_secs: 300,
            enemy: EnemySpec {
                name: "Bandit".into(),
                max_health: 200,
                max_stamina: 50,
                attack: 15,
                defense: 5,
                agility: 4,
                rates: SkillRates::NONE.with_critical(150),
            },
            rewards: TrialRewards {
                qi: 100,
                currency: 25,
            },
        }
    }

    #[test]
    fn enemy_combatant_is_ready_to_fight() {
        let enemy = sample().enemy_combatant("bandit_camp");
        assert_eq!(enemy.id, "trial:bandit_camp");
        assert_eq!(enemy.current_health, 200);
        assert_eq!(enemy.rates.critical, 100);
    }

    #[test]
    fn zero_health_enemy_is_a_problem() {
        let mut broken = sample();
        broken.enemy.max_health = 0;
        assert!(broken.problem().is_some());
        assert!(sample().problem().is_none());
    }

    #[test]
    fn catalog_lookup() {
        let catalog: TrialCatalog = [("cave".to_string(), sample())].into_iter().collect();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("cave").map(|t| t.energy_cost), Some(10));
        assert!(catalog.get("nowhere").is_none());
    }
}
