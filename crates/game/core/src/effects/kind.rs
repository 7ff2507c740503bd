//! Status effect types.

use arrayvec::ArrayVec;

/// Maximum number of live effects a combatant can carry.
pub const MAX_STATUS_EFFECTS: usize = 16;

/// Bounded, ordered list of active effects (oldest first).
pub type EffectList = ArrayVec<StatusEffect, MAX_STATUS_EFFECTS>;

/// Kind of status effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectKind {
    /// Damage over time scaled from the source's attack.
    Burn,
    /// Damage over time scaled from the source's attack, longer and weaker.
    Poison,
    /// Skips the holder's next action.
    Freeze,
    /// Skips the holder's next action.
    Stun,
    /// Instant heal for a share of the damage dealt; never attached.
    Lifesteal,
    /// Heal over time scaled from the holder's max health.
    Regen,
}

impl EffectKind {
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Burn | Self::Poison)
    }

    pub const fn is_heal_over_time(self) -> bool {
        matches!(self, Self::Regen)
    }

    /// Freeze and stun prevent the holder from acting.
    pub const fn is_control(self) -> bool {
        matches!(self, Self::Freeze | Self::Stun)
    }

    /// Resolved at hit time instead of being attached to a combatant.
    pub const fn is_instant(self) -> bool {
        matches!(self, Self::Lifesteal)
    }
}

/// One active (or, for instant kinds, just-resolved) effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Damage or healing per stack per turn; heal amount for instant kinds.
    pub value: u32,
    pub stacks: u32,
    pub remaining_turns: u32,
    pub stackable: bool,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, value: u32, remaining_turns: u32, stackable: bool) -> Self {
        Self {
            kind,
            value,
            stacks: 1,
            remaining_turns,
            stackable,
        }
    }

    /// Amount dealt or healed by one tick of this effect.
    pub fn per_turn_amount(&self) -> u32 {
        self.value.saturating_mul(self.stacks)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_turns == 0
    }
}
