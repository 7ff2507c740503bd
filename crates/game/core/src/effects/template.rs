//! Effect templates: how a successful roll turns into a [`StatusEffect`].

use super::kind::{EffectKind, StatusEffect};

/// Quantity an effect's value is scaled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueBasis {
    /// Effect carries no magnitude (freeze, stun).
    None,
    SourceAttack,
    SourceMaxHealth,
    DamageDealt,
}

/// Numbers describing the inputs available when an effect is rolled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectSource {
    pub attack: u32,
    pub max_health: u32,
    pub damage_dealt: u32,
}

/// Template for one effect kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub basis: ValueBasis,
    /// Percent of the basis quantity.
    pub value_pct: u32,
    /// Lower bound on the value when the basis is not `None`.
    pub min_value: u32,
    pub duration: u32,
    pub stackable: bool,
}

impl EffectTemplate {
    pub fn value_for(&self, source: &EffectSource) -> u32 {
        let base = match self.basis {
            ValueBasis::None => return 0,
            ValueBasis::SourceAttack => source.attack,
            ValueBasis::SourceMaxHealth => source.max_health,
            ValueBasis::DamageDealt => source.damage_dealt,
        };
        let scaled = base as u64 * self.value_pct as u64 / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX).max(self.min_value)
    }

    pub fn instantiate(&self, kind: EffectKind, source: &EffectSource) -> StatusEffect {
        StatusEffect::new(kind, self.value_for(source), self.duration, self.stackable)
    }
}

/// What happens when an effect lands on a holder that already has one of
/// the same kind.
///
/// Non-stackable kinds always refresh regardless of policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StackPolicy {
    /// Each application is its own entry with its own timer, up to
    /// `max_stacks` entries per kind. At the cap the entry closest to
    /// expiring is refreshed instead.
    #[default]
    Independent,
    /// Reset the existing entry's timer; stacks never grow.
    Refresh,
    /// Grow the existing entry's stacks (up to `max_stacks`) and reset its timer.
    StackAndRefresh,
}

/// Effect engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectConfig {
    pub burn: EffectTemplate,
    pub poison: EffectTemplate,
    pub freeze: EffectTemplate,
    pub stun: EffectTemplate,
    pub regen: EffectTemplate,
    pub lifesteal: EffectTemplate,
    pub stack_policy: StackPolicy,
    pub max_stacks: u32,
}

impl EffectConfig {
    pub fn template(&self, kind: EffectKind) -> &EffectTemplate {
        match kind {
            EffectKind::Burn => &self.burn,
            EffectKind::Poison => &self.poison,
            EffectKind::Freeze => &self.freeze,
            EffectKind::Stun => &self.stun,
            EffectKind::Regen => &self.regen,
            EffectKind::Lifesteal => &self.lifesteal,
        }
    }

    pub fn with_stack_policy(mut self, policy: StackPolicy) -> Self {
        self.stack_policy = policy;
        self
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            burn: EffectTemplate {
                basis: ValueBasis::SourceAttack,
                value_pct: 10,
                min_value: 1,
                duration: 3,
                stackable: true,
            },
            poison: EffectTemplate {
                basis: ValueBasis::SourceAttack,
                value_pct: 8,
                min_value: 1,
                duration: 4,
                stackable: true,
            },
            freeze: EffectTemplate {
                basis: ValueBasis::None,
                value_pct: 0,
                min_value: 0,
                duration: 1,
                stackable: false,
            },
            stun: EffectTemplate {
                basis: ValueBasis::None,
                value_pct: 0,
                min_value: 0,
                duration: 1,
                stackable: false,
            },
            regen: EffectTemplate {
                basis: ValueBasis::SourceMaxHealth,
                value_pct: 5,
                min_value: 1,
                duration: 2,
                stackable: true,
            },
            lifesteal: EffectTemplate {
                basis: ValueBasis::DamageDealt,
                value_pct: 25,
                min_value: 0,
                duration: 0,
                stackable: false,
            },
            stack_policy: StackPolicy::Independent,
            max_stacks: 5,
        }
    }
}
