//! Effect Engine - roll-and-create, attach, tick-and-resolve.
//!
//! Creating an effect ([`apply_effect_roll`]) is decoupled from resolving
//! it ([`tick_effects`]) so the combat resolver decides *when* an effect
//! lands (on hit) and *when* it pays out (start of the holder's next turns).

use super::kind::{EffectKind, StatusEffect};
use super::template::{EffectConfig, EffectSource, StackPolicy};
use crate::combat::CombatantState;
use crate::rng::Roller;

/// Roll once against `rate`; on success build the effect from its template.
///
/// Exactly one percentage draw is consumed whatever the rate.
pub fn apply_effect_roll(
    kind: EffectKind,
    rate: u32,
    source: &EffectSource,
    config: &EffectConfig,
    roller: &mut impl Roller,
) -> Option<StatusEffect> {
    if !roller.check(rate) {
        return None;
    }
    Some(config.template(kind).instantiate(kind, source))
}

/// Attach `effect` to `target` following the configured stack policy.
///
/// Returns `false` when the effect did not land: instant kinds, or no room
/// left in the bounded effect list.
pub fn attach_effect(
    target: &mut CombatantState,
    effect: StatusEffect,
    config: &EffectConfig,
) -> bool {
    if effect.kind.is_instant() {
        return false;
    }

    let effects = &mut target.effects;
    let policy = if effect.stackable {
        config.stack_policy
    } else {
        StackPolicy::Refresh
    };
    let max_stacks = config.max_stacks.max(1);

    match policy {
        StackPolicy::Independent => {
            let live = effects.iter().filter(|e| e.kind == effect.kind).count();
            if live as u32 >= max_stacks {
                // At the cap: refresh the entry closest to expiring.
                if let Some(oldest) = effects
                    .iter_mut()
                    .filter(|e| e.kind == effect.kind)
                    .min_by_key(|e| e.remaining_turns)
                {
                    oldest.remaining_turns = oldest.remaining_turns.max(effect.remaining_turns);
                    oldest.value = oldest.value.max(effect.value);
                    return true;
                }
            }
            effects.try_push(effect).is_ok()
        }
        StackPolicy::Refresh | StackPolicy::StackAndRefresh => {
            if let Some(existing) = effects.iter_mut().find(|e| e.kind == effect.kind) {
                existing.remaining_turns = effect.remaining_turns;
                existing.value = existing.value.max(effect.value);
                if policy == StackPolicy::StackAndRefresh {
                    existing.stacks = (existing.stacks + 1).min(max_stacks);
                }
                return true;
            }
            effects.try_push(effect).is_ok()
        }
    }
}

/// Net result of one tick over a combatant's effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTick {
    pub damage: u32,
    pub healing: u32,
    /// Number of effects that expired during this tick.
    pub expired: u32,
}

impl EffectTick {
    pub fn is_empty(&self) -> bool {
        self.damage == 0 && self.healing == 0 && self.expired == 0
    }
}

/// Resolve one turn of effects on `state`.
///
/// Burn and poison deal `value × stacks`; regen heals `value × stacks`
/// (only while the holder survives the damage). Every effect then loses one
/// turn and expired effects are removed. Health stays within
/// `[0, max_health]`.
pub fn tick_effects(state: &mut CombatantState) -> EffectTick {
    let mut tick = EffectTick::default();

    for effect in state.effects.iter_mut() {
        let amount = effect.per_turn_amount();
        if effect.kind.is_damage_over_time() {
            tick.damage = tick.damage.saturating_add(amount);
        } else if effect.kind.is_heal_over_time() {
            tick.healing = tick.healing.saturating_add(amount);
        }
        effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
    }

    let before = state.effects.len();
    state.effects.retain(|e| !e.is_expired());
    tick.expired = (before - state.effects.len()) as u32;

    let dealt = state.take_damage(tick.damage);
    tick.damage = dealt;
    tick.healing = if state.is_alive() {
        state.heal(tick.healing)
    } else {
        0
    };

    tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRolls;
    use crate::stats::SkillRates;

    fn holder() -> CombatantState {
        CombatantState::new("target", "Target", 100, 50, 10, 5, 5, SkillRates::NONE)
    }

    fn source() -> EffectSource {
        EffectSource {
            attack: 40,
            max_health: 200,
            damage_dealt: 60,
        }
    }

    #[test]
    fn roll_triggers_only_below_rate() {
        let config = EffectConfig::default();
        let mut rolls = FixedRolls::new(vec![29, 30]);
        let hit = apply_effect_roll(EffectKind::Burn, 30, &source(), &config, &mut rolls);
        let miss = apply_effect_roll(EffectKind::Burn, 30, &source(), &config, &mut rolls);

        let burn = hit.expect("29 < 30 should trigger");
        assert_eq!(burn.value, 4); // 10% of 40
        assert_eq!(burn.remaining_turns, 3);
        assert!(miss.is_none());
    }

    #[test]
    fn zero_rate_never_triggers() {
        let config = EffectConfig::default();
        let mut rolls = FixedRolls::constant(0);
        for _ in 0..10 {
            assert!(
                apply_effect_roll(EffectKind::Stun, 0, &source(), &config, &mut rolls).is_none()
            );
        }
    }

    #[test]
    fn lifesteal_is_instant() {
        let config = EffectConfig::default();
        let mut rolls = FixedRolls::constant(0);
        let steal = apply_effect_roll(EffectKind::Lifesteal, 100, &source(), &config, &mut rolls)
            .expect("always triggers");
        assert_eq!(steal.value, 15); // 25% of 60

        let mut target = holder();
        assert!(!attach_effect(&mut target, steal, &config));
        assert!(target.effects.is_empty());
    }

    #[test]
    fn burn_ticks_then_expires() {
        let config = EffectConfig::default();
        let mut target = holder();
        attach_effect(&mut target, StatusEffect::new(EffectKind::Burn, 5, 2, true), &config);

        let first = tick_effects(&mut target);
        assert_eq!(first.damage, 5);
        assert_eq!(target.current_health, 95);
        assert_eq!(target.effects.len(), 1);

        let second = tick_effects(&mut target);
        assert_eq!(second.damage, 5);
        assert_eq!(second.expired, 1);
        assert!(target.effects.is_empty());

        assert!(tick_effects(&mut target).is_empty());
        assert_eq!(target.current_health, 90);
    }

    #[test]
    fn regen_heals_capped_at_max() {
        let config = EffectConfig::default();
        let mut target = holder();
        target.current_health = 97;
        attach_effect(&mut target, StatusEffect::new(EffectKind::Regen, 10, 2, true), &config);

        let tick = tick_effects(&mut target);
        assert_eq!(tick.healing, 3);
        assert_eq!(target.current_health, 100);
    }

    #[test]
    fn lethal_poison_blocks_regen() {
        let config = EffectConfig::default();
        let mut target = holder();
        target.current_health = 4;
        attach_effect(&mut target, StatusEffect::new(EffectKind::Poison, 10, 3, true), &config);
        attach_effect(&mut target, StatusEffect::new(EffectKind::Regen, 50, 3, true), &config);

        let tick = tick_effects(&mut target);
        assert_eq!(tick.damage, 4);
        assert_eq!(tick.healing, 0);
        assert!(target.is_defeated());
    }

    #[test]
    fn independent_stacks_keep_their_own_timers() {
        let config = EffectConfig::default();
        let mut target = holder();
        attach_effect(&mut target, StatusEffect::new(EffectKind::Burn, 2, 1, true), &config);
        attach_effect(&mut target, StatusEffect::new(EffectKind::Burn, 2, 3, true), &config);

        assert_eq!(tick_effects(&mut target).damage, 4);
        // The 1-turn stack expired; the 3-turn stack keeps burning.
        assert_eq!(target.effects.len(), 1);
        assert_eq!(tick_effects(&mut target).damage, 2);
    }

    #[test]
    fn independent_stacks_cap_by_refreshing() {
        let config = EffectConfig {
            max_stacks: 2,
            ..EffectConfig::default()
        };
        let mut target = holder();
        attach_effect(&mut target, StatusEffect::new(EffectKind::Poison, 1, 1, true), &config);
        attach_effect(&mut target, StatusEffect::new(EffectKind::Poison, 1, 4, true), &config);
        assert!(attach_effect(
            &mut target,
            StatusEffect::new(EffectKind::Poison, 1, 4, true),
            &config
        ));

        assert_eq!(target.effects.len(), 2);
        assert!(target.effects.iter().all(|e| e.remaining_turns == 4));
    }

    #[test]
    fn stack_and_refresh_grows_one_entry() {
        let config = EffectConfig::default().with_stack_policy(StackPolicy::StackAndRefresh);
        let mut target = holder();
        for _ in 0..7 {
            attach_effect(&mut target, StatusEffect::new(EffectKind::Burn, 3, 3, true), &config);
        }
        assert_eq!(target.effects.len(), 1);
        assert_eq!(target.effects[0].stacks, 5);
        assert_eq!(tick_effects(&mut target).damage, 15);
    }

    #[test]
    fn refresh_policy_resets_the_timer() {
        let config = EffectConfig::default().with_stack_policy(StackPolicy::Refresh);
        let mut target = holder();
        attach_effect(&mut target, StatusEffect::new(EffectKind::Burn, 3, 3, true), &config);
        tick_effects(&mut target);
        attach_effect(&mut target, StatusEffect::new(EffectKind::Burn, 3, 3, true), &config);

        assert_eq!(target.effects.len(), 1);
        assert_eq!(target.effects[0].remaining_turns, 3);
        assert_eq!(target.effects[0].stacks, 1);
    }

    #[test]
    fn control_effects_refresh_instead_of_stacking() {
        let config = EffectConfig::default();
        let mut target = holder();
        attach_effect(&mut target, StatusEffect::new(EffectKind::Stun, 0, 1, false), &config);
        attach_effect(&mut target, StatusEffect::new(EffectKind::Stun, 0, 1, false), &config);
        assert_eq!(target.effects.len(), 1);
        assert!(target.is_incapacitated());

        tick_effects(&mut target);
        assert!(!target.is_incapacitated());
    }

    #[test]
    fn full_effect_list_rejects_new_effects() {
        let config = EffectConfig {
            max_stacks: 100,
            ..EffectConfig::default()
        };
        let mut target = holder();
        for _ in 0..crate::effects::MAX_STATUS_EFFECTS {
            assert!(attach_effect(
                &mut target,
                StatusEffect::new(EffectKind::Burn, 1, 5, true),
                &config
            ));
        }
        assert!(!attach_effect(
            &mut target,
            StatusEffect::new(EffectKind::Poison, 1, 5, true),
            &config
        ));
    }
}
