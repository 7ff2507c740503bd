//! Combatant state - one side of a fight at a point in time.

use crate::effects::EffectList;
use crate::error::{CombatantFault, EngineError, Result};
use crate::stats::{BaseCombatStats, SkillRates};

use super::record::Side;

/// One side of a fight.
///
/// Built from a character or trial snapshot at combat start, mutated by the
/// resolver turn by turn, and discarded afterwards; only the outcome is
/// persisted.
///
/// Invariants (checked by [`CombatantState::validate`]):
/// `0 ≤ current_health ≤ max_health`, `0 ≤ current_stamina ≤ max_stamina`,
/// both maximums non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub id: String,
    pub name: String,

    pub current_health: u32,
    pub max_health: u32,
    pub current_stamina: u32,
    pub max_stamina: u32,

    pub attack: u32,
    pub defense: u32,
    pub agility: u32,

    pub rates: SkillRates,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: EffectList,
}

impl CombatantState {
    /// Create a combatant at full health and stamina with no effects.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        max_health: u32,
        max_stamina: u32,
        attack: u32,
        defense: u32,
        agility: u32,
        rates: SkillRates,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_health: max_health,
            max_health,
            current_stamina: max_stamina,
            max_stamina,
            attack,
            defense,
            agility,
            rates,
            effects: EffectList::new(),
        }
    }

    /// Create a combatant from derived stats, at full vitals.
    pub fn from_base(id: impl Into<String>, name: impl Into<String>, base: &BaseCombatStats) -> Self {
        Self::new(
            id,
            name,
            base.max_health,
            base.max_stamina,
            base.attack,
            base.defense,
            base.agility,
            base.rates,
        )
    }

    /// Override current vitals, clamped to the maximums.
    pub fn with_vitals(mut self, health: u32, stamina: u32) -> Self {
        self.current_health = health.min(self.max_health);
        self.current_stamina = stamina.min(self.max_stamina);
        self
    }

    pub fn with_rates(mut self, rates: SkillRates) -> Self {
        self.rates = rates;
        self
    }

    /// Check the vitals invariants before a fight.
    pub fn validate(&self, side: Side) -> Result<()> {
        let fault = if self.max_health == 0 {
            Some(CombatantFault::ZeroMaxHealth)
        } else if self.max_stamina == 0 {
            Some(CombatantFault::ZeroMaxStamina)
        } else if self.current_health > self.max_health {
            Some(CombatantFault::HealthAboveMax)
        } else if self.current_stamina > self.max_stamina {
            Some(CombatantFault::StaminaAboveMax)
        } else if self.current_health == 0 {
            Some(CombatantFault::AlreadyDefeated)
        } else {
            None
        };

        match fault {
            Some(fault) => Err(EngineError::InvalidCombatant { side, fault }),
            None => Ok(()),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn is_defeated(&self) -> bool {
        self.current_health == 0
    }

    /// Frozen or stunned: the next action is skipped.
    pub fn is_incapacitated(&self) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind.is_control() && e.remaining_turns > 0)
    }

    /// Reduce health, clamped at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current_health);
        self.current_health -= taken;
        taken
    }

    /// Restore health, capped at `max_health`. Returns the amount healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let room = self.max_health - self.current_health.min(self.max_health);
        let healed = amount.min(room);
        self.current_health += healed;
        healed
    }

    /// Spend stamina, saturating at zero. Returns the amount spent.
    pub fn spend_stamina(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.current_stamina);
        self.current_stamina -= spent;
        spent
    }
}
