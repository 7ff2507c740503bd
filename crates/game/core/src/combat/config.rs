use crate::error::{EngineError, Result};

/// Who acts when within a round.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TurnOrder {
    /// Both sides act once per turn; higher agility first, attacker on ties.
    #[default]
    Agility,
    /// One action per turn: attacker on odd turns, defender on even turns.
    Alternating,
}

/// Tunables for the combat resolver.
///
/// Percentages are integers (150 = ×1.5).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub max_turns: u32,
    pub turn_order: TurnOrder,
    pub min_damage: u32,
    pub variance_min_pct: u32,
    pub variance_max_pct: u32,
    pub crit_multiplier_pct: u32,
    pub multi_strike_min: u32,
    pub multi_strike_max: u32,
    /// Damage each strike after the first adds, as a percent of the hit.
    pub extra_strike_pct: u32,
    pub stamina_per_strike: u32,
    pub counter_damage_pct: u32,
}

impl CombatConfig {
    pub const DEFAULT_MAX_TURNS: u32 = 10;
    pub const CRIT_MULTIPLIER_STANDARD: u32 = 150;
    pub const CRIT_MULTIPLIER_HEAVY: u32 = 200;

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_turn_order(mut self, turn_order: TurnOrder) -> Self {
        self.turn_order = turn_order;
        self
    }

    pub fn with_crit_multiplier(mut self, pct: u32) -> Self {
        self.crit_multiplier_pct = pct;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(EngineError::InvalidInput {
                field: "max_turns",
                reason: "must be at least 1",
            });
        }
        if self.variance_min_pct > self.variance_max_pct {
            return Err(EngineError::InvalidInput {
                field: "variance_min_pct",
                reason: "must not exceed variance_max_pct",
            });
        }
        if self.multi_strike_min < 1 || self.multi_strike_min > self.multi_strike_max {
            return Err(EngineError::InvalidInput {
                field: "multi_strike_min",
                reason: "must be at least 1 and not exceed multi_strike_max",
            });
        }
        Ok(())
    }

    /// Limit a rolled strike count to the stamina the actor has left.
    ///
    /// One strike is always allowed.
    pub fn affordable_strikes(&self, stamina: u32, rolled: u32) -> u32 {
        if self.stamina_per_strike == 0 {
            return rolled.max(1);
        }
        rolled.min(stamina / self.stamina_per_strike).max(1)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_turns: Self::DEFAULT_MAX_TURNS,
            turn_order: TurnOrder::Agility,
            min_damage: 1,
            variance_min_pct: 80,
            variance_max_pct: 120,
            crit_multiplier_pct: Self::CRIT_MULTIPLIER_STANDARD,
            multi_strike_min: 2,
            multi_strike_max: 4,
            extra_strike_pct: 30,
            stamina_per_strike: 5,
            counter_damage_pct: 50,
        }
    }
}
