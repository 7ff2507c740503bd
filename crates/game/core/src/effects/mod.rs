//! Status effects: burn, poison, freeze, stun, regen, lifesteal.
//!
//! # Lifecycle
//!
//! 1. A hit rolls each effect rate ([`apply_effect_roll`])
//! 2. Successful rolls are attached to their target ([`attach_effect`]),
//!    except lifesteal which the resolver pays out immediately
//! 3. At the start of each of the holder's turns, [`tick_effects`] pays out
//!    damage/healing, decrements timers and drops expired effects
//!
//! Freeze and stun carry no value; the resolver checks
//! [`CombatantState::is_incapacitated`] before letting the holder act.
//!
//! [`CombatantState::is_incapacitated`]: crate::combat::CombatantState::is_incapacitated

pub mod engine;
pub mod kind;
pub mod template;

pub use engine::{EffectTick, apply_effect_roll, attach_effect, tick_effects};
pub use kind::{EffectKind, EffectList, MAX_STATUS_EFFECTS, StatusEffect};
pub use template::{EffectConfig, EffectSource, EffectTemplate, StackPolicy, ValueBasis};
