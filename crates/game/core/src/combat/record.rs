//! Combat log entries and outcome types.

use crate::effects::{EffectKind, EffectTick};

use super::combatant::CombatantState;

/// Which side of the encounter a combatant is on.
///
/// The attacker is the side that initiated the fight (the player in PvE).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Attacker => Self::Defender,
            Self::Defender => Self::Attacker,
        }
    }
}

/// What the acting combatant did with its action slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "kind"))]
pub enum TurnAction {
    /// Attacked the opponent.
    Strike,
    /// Lost the action to a control effect.
    Skipped { cause: EffectKind },
    /// Died to its own damage-over-time before acting.
    Succumbed,
}

/// Immutable log entry for one action slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatTurnRecord {
    pub turn: u32,
    pub actor: Side,
    pub actor_id: String,
    pub target_id: String,
    pub action: TurnAction,

    /// Effect payout on the actor at the start of its action.
    pub effect_tick: EffectTick,

    pub damage: u32,
    pub is_critical: bool,
    pub is_multi_strike: bool,
    pub strike_count: u32,
    pub stamina_spent: u32,
    pub is_counter: bool,
    pub counter_damage: u32,
    pub life_stolen: u32,
    /// Effects that landed on the target.
    pub effects_applied: Vec<EffectKind>,
    /// Effects the actor put on itself (regen).
    pub self_effects: Vec<EffectKind>,

    /// Health of the encounter's attacker after this action.
    pub attacker_health: u32,
    /// Health of the encounter's defender after this action.
    pub defender_health: u32,
}

impl CombatTurnRecord {
    pub(crate) fn new(turn: u32, actor: Side, actor_id: &str, target_id: &str, action: TurnAction) -> Self {
        Self {
            turn,
            actor,
            actor_id: actor_id.to_owned(),
            target_id: target_id.to_owned(),
            action,
            effect_tick: EffectTick::default(),
            damage: 0,
            is_critical: false,
            is_multi_strike: false,
            strike_count: 0,
            stamina_spent: 0,
            is_counter: false,
            counter_damage: 0,
            life_stolen: 0,
            effects_applied: Vec::new(),
            self_effects: Vec::new(),
            attacker_health: 0,
            defender_health: 0,
        }
    }
}

/// How the encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "kind"))]
pub enum CombatEnd {
    /// One side reached zero health.
    Defeat { loser: Side },
    /// Both sides reached zero health in the same action; the attacker loses.
    DoubleKnockout,
    /// `max_turns` ran out with both sides standing; the attacker failed.
    Timeout,
}

/// Result of a resolved encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub winner: Side,
    pub end: CombatEnd,
    /// Number of turns (rounds) started.
    pub turns: u32,
    pub log: Vec<CombatTurnRecord>,
    pub attacker: CombatantState,
    pub defender: CombatantState,
}

impl CombatOutcome {
    /// The attacker earns rewards only by ending the fight decisively.
    pub fn rewards_eligible(&self) -> bool {
        self.winner == Side::Attacker
    }

    pub fn attacker_won(&self) -> bool {
        self.winner == Side::Attacker
    }

    pub fn total_damage_by(&self, side: Side) -> u64 {
        self.log
            .iter()
            .filter(|r| r.actor == side)
            .map(|r| r.damage as u64)
            .sum()
    }
}
