//! Turn-by-turn combat resolution.
//!
//! Every random decision is drawn from the supplied [`Roller`] in a fixed
//! order, so a fight replays exactly from its seed:
//!
//! ```text
//! variance → critical → multi-strike (→ strike count) → counter
//!          → lifesteal → burn → poison → freeze → stun → regen
//! ```
//!
//! Rolls are consumed even when their result cannot apply (for example a
//! burn roll against a defender who is already down).

use crate::effects::{
    EffectConfig, EffectKind, EffectSource, apply_effect_roll, attach_effect, tick_effects,
};
use crate::error::Result;
use crate::rng::Roller;

use super::combatant::CombatantState;
use super::config::{CombatConfig, TurnOrder};
use super::damage::{
    apply_critical, apply_variance, base_damage, counter_damage, multi_strike_bonus,
};
use super::record::{CombatEnd, CombatOutcome, CombatTurnRecord, Side, TurnAction};

/// Resolve a full encounter between `attacker` and `defender`.
///
/// Fails only on malformed inputs; running out of turns ends the fight with
/// [`CombatEnd::Timeout`].
pub fn resolve_combat(
    attacker: CombatantState,
    defender: CombatantState,
    config: &CombatConfig,
    effects: &EffectConfig,
    roller: &mut impl Roller,
) -> Result<CombatOutcome> {
    config.validate()?;
    attacker.validate(Side::Attacker)?;
    defender.validate(Side::Defender)?;

    let mut fight = Fight {
        attacker,
        defender,
        log: Vec::new(),
    };

    for turn in 1..=config.max_turns {
        for side in fight.action_order(turn, config.turn_order) {
            fight.take_action(turn, side, config, effects, roller);
            if let Some(end) = fight.terminal_state() {
                return Ok(fight.finish(end, turn));
            }
        }
    }

    Ok(fight.finish(CombatEnd::Timeout, config.max_turns))
}

// ============================================================================
// Fight State
// ============================================================================

struct Fight {
    attacker: CombatantState,
    defender: CombatantState,
    log: Vec<CombatTurnRecord>,
}

impl Fight {
    fn action_order(&self, turn: u32, order: TurnOrder) -> Vec<Side> {
        match order {
            TurnOrder::Agility => {
                if self.defender.agility > self.attacker.agility {
                    vec![Side::Defender, Side::Attacker]
                } else {
                    vec![Side::Attacker, Side::Defender]
                }
            }
            TurnOrder::Alternating => {
                if turn % 2 == 1 {
                    vec![Side::Attacker]
                } else {
                    vec![Side::Defender]
                }
            }
        }
    }

    fn pair_mut(&mut self, actor: Side) -> (&mut CombatantState, &mut CombatantState) {
        match actor {
            Side::Attacker => (&mut self.attacker, &mut self.defender),
            Side::Defender => (&mut self.defender, &mut self.attacker),
        }
    }

    fn take_action(
        &mut self,
        turn: u32,
        side: Side,
        config: &CombatConfig,
        effects: &EffectConfig,
        roller: &mut impl Roller,
    ) {
        let (actor, target) = self.pair_mut(side);

        // Incapacitation is read before the tick so a 1-turn freeze still
        // costs the action during which it expires.
        let control = actor
            .effects
            .iter()
            .find(|e| e.kind.is_control() && e.remaining_turns > 0)
            .map(|e| e.kind);
        let tick = tick_effects(actor);

        let action = if actor.is_defeated() {
            TurnAction::Succumbed
        } else if let Some(cause) = control {
            TurnAction::Skipped { cause }
        } else {
            TurnAction::Strike
        };

        let mut record = CombatTurnRecord::new(turn, side, &actor.id, &target.id, action);
        record.effect_tick = tick;

        if action == TurnAction::Strike {
            resolve_strike(actor, target, config, effects, roller, &mut record);
        }

        record.attacker_health = self.attacker.current_health;
        record.defender_health = self.defender.current_health;
        self.log.push(record);
    }

    fn terminal_state(&self) -> Option<CombatEnd> {
        match (self.attacker.is_defeated(), self.defender.is_defeated()) {
            (true, true) => Some(CombatEnd::DoubleKnockout),
            (true, false) => Some(CombatEnd::Defeat {
                loser: Side::Attacker,
            }),
            (false, true) => Some(CombatEnd::Defeat {
                loser: Side::Defender,
            }),
            (false, false) => None,
        }
    }

    fn finish(self, end: CombatEnd, turns: u32) -> CombatOutcome {
        let winner = match end {
            CombatEnd::Defeat { loser } => loser.opponent(),
            CombatEnd::DoubleKnockout | CombatEnd::Timeout => Side::Defender,
        };
        CombatOutcome {
            winner,
            end,
            turns,
            log: self.log,
            attacker: self.attacker,
            defender: self.defender,
        }
    }
}

// ============================================================================
// Strike Resolution
// ============================================================================

fn resolve_strike(
    actor: &mut CombatantState,
    target: &mut CombatantState,
    config: &CombatConfig,
    effects: &EffectConfig,
    roller: &mut impl Roller,
    record: &mut CombatTurnRecord,
) {
    let base = base_damage(actor.attack, target.defense, config.min_damage);
    let variance = roller.roll_range(config.variance_min_pct, config.variance_max_pct);
    let hit = apply_variance(base, variance, config.min_damage);

    record.is_critical = roller.check(actor.rates.critical);
    let mut damage = if record.is_critical {
        apply_critical(hit, config.crit_multiplier_pct)
    } else {
        hit
    };

    let mut strikes = 1;
    if roller.check(actor.rates.multi_strike) {
        let rolled = roller.roll_range(config.multi_strike_min, config.multi_strike_max);
        strikes = config.affordable_strikes(actor.current_stamina, rolled);
        damage = damage.saturating_add(multi_strike_bonus(
            hit,
            strikes - 1,
            config.extra_strike_pct,
        ));
    }
    record.is_multi_strike = strikes > 1;
    record.strike_count = strikes;
    record.stamina_spent = actor.spend_stamina(config.stamina_per_strike.saturating_mul(strikes));

    record.damage = target.take_damage(damage);

    // The target strikes back even when the blow was fatal.
    if roller.check(target.rates.counter_attack) {
        let counter = counter_damage(
            target.attack,
            actor.defense,
            config.counter_damage_pct,
            config.min_damage,
        );
        record.is_counter = true;
        record.counter_damage = actor.take_damage(counter);
    }

    let source = EffectSource {
        attack: actor.attack,
        max_health: actor.max_health,
        damage_dealt: record.damage,
    };

    let steal = apply_effect_roll(
        EffectKind::Lifesteal,
        actor.rates.life_steal,
        &source,
        effects,
        roller,
    );
    if let Some(steal) = steal {
        if actor.is_alive() {
            record.life_stolen = actor.heal(steal.value);
        }
    }

    let debuffs = [
        (EffectKind::Burn, actor.rates.burn),
        (EffectKind::Poison, actor.rates.poison),
        (EffectKind::Freeze, actor.rates.freeze),
        (EffectKind::Stun, actor.rates.stun),
    ];
    for (kind, rate) in debuffs {
        let Some(effect) = apply_effect_roll(kind, rate, &source, effects, roller) else {
            continue;
        };
        if target.is_alive() && attach_effect(target, effect, effects) {
            record.effects_applied.push(kind);
        }
    }

    let regen = apply_effect_roll(
        EffectKind::Regen,
        actor.rates.health_regen,
        &source,
        effects,
        roller,
    );
    if let Some(regen) = regen {
        if actor.is_alive() && attach_effect(actor, regen, effects) {
            record.self_effects.push(EffectKind::Regen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::StatusEffect;
    use crate::error::{CombatantFault, EngineError};
    use crate::rng::{FixedRolls, RollStream};
    use crate::stats::SkillRates;

    fn combatant(id: &str, health: u32, attack: u32, defense: u32, agility: u32) -> CombatantState {
        CombatantState::new(id, id, health, 100, attack, defense, agility, SkillRates::NONE)
    }

    fn resolve(
        attacker: CombatantState,
        defender: CombatantState,
        roller: &mut impl Roller,
    ) -> CombatOutcome {
        resolve_combat(
            attacker,
            defender,
            &CombatConfig::default(),
            &EffectConfig::default(),
            roller,
        )
        .expect("valid combatants")
    }

    #[test]
    fn plain_hits_stay_in_variance_band() {
        let attacker = combatant("a", 10_000, 20, 10, 10);
        let defender = combatant("d", 10_000, 20, 10, 5);

        for seed in 0..20 {
            let outcome = resolve(attacker.clone(), defender.clone(), &mut RollStream::new(seed));
            for record in &outcome.log {
                assert!((8..=12).contains(&record.damage), "damage {}", record.damage);
                assert!(!record.is_critical);
                assert!(!record.is_counter);
                assert!(!record.is_multi_strike);
                assert_eq!(record.strike_count, 1);
            }
        }
    }

    #[test]
    fn certain_critical_on_every_attacker_hit() {
        let attacker = combatant("a", 10_000, 20, 10, 10)
            .with_rates(SkillRates::NONE.with_critical(100));
        let defender = combatant("d", 10_000, 20, 10, 5);

        let outcome = resolve(attacker, defender, &mut RollStream::new(7));
        let attacker_hits: Vec<_> = outcome
            .log
            .iter()
            .filter(|r| r.actor == Side::Attacker)
            .collect();
        assert!(!attacker_hits.is_empty());
        assert!(attacker_hits.iter().all(|r| r.is_critical));
        assert!(attacker_hits.iter().all(|r| (12..=18).contains(&r.damage)));
    }

    #[test]
    fn heavy_critical_doubles_the_hit() {
        let attacker = combatant("a", 10_000, 20, 10, 10)
            .with_rates(SkillRates::NONE.with_critical(100));
        let defender = combatant("d", 10_000, 20, 10, 5);
        let heavy =
            CombatConfig::default().with_crit_multiplier(CombatConfig::CRIT_MULTIPLIER_HEAVY);

        let standard = resolve(attacker.clone(), defender.clone(), &mut FixedRolls::constant(0));
        let doubled = resolve_combat(
            attacker,
            defender,
            &heavy,
            &EffectConfig::default(),
            &mut FixedRolls::constant(0),
        )
        .expect("valid combatants");

        // Base 10 at 80% variance is 8 before the critical.
        assert_eq!(standard.log[0].damage, 12);
        assert_eq!(doubled.log[0].damage, 16);
        assert!(doubled.log[0].is_critical);
    }

    #[test]
    fn equal_agility_attacker_acts_first() {
        let attacker = combatant("a", 10_000, 20, 10, 10);
        let defender = combatant("d", 10_000, 20, 10, 10);

        let outcome = resolve(attacker, defender, &mut RollStream::new(3));
        assert_eq!(outcome.log[0].actor, Side::Attacker);
        assert_eq!(outcome.log[1].actor, Side::Defender);
    }

    #[test]
    fn dying_counter_hands_victory_to_defender() {
        // Roll 0 everywhere: variance clamps to 80%, every nonzero rate fires.
        let attacker = combatant("a", 10, 50, 0, 10);
        let defender = combatant("d", 30, 40, 0, 5)
            .with_rates(SkillRates::NONE.with_counter_attack(100));

        let outcome = resolve(attacker, defender, &mut FixedRolls::constant(0));

        assert_eq!(outcome.end, CombatEnd::DoubleKnockout);
        assert_eq!(outcome.winner, Side::Defender);
        assert!(!outcome.rewards_eligible());
        assert_eq!(outcome.log.len(), 1);

        let record = &outcome.log[0];
        assert_eq!(record.damage, 30);
        assert!(record.is_counter);
        assert_eq!(record.counter_damage, 10);
        assert_eq!((record.attacker_health, record.defender_health), (0, 0));
    }

    #[test]
    fn timeout_goes_to_defender() {
        let attacker = combatant("a", 10_000, 5, 5, 10);
        let defender = combatant("d", 10_000, 5, 5, 5);

        let outcome = resolve(attacker, defender, &mut RollStream::new(3));
        assert_eq!(outcome.end, CombatEnd::Timeout);
        assert_eq!(outcome.winner, Side::Defender);
        assert_eq!(outcome.turns, CombatConfig::DEFAULT_MAX_TURNS);
        assert_eq!(outcome.log.len(), 20);
        assert!(!outcome.rewards_eligible());
    }

    #[test]
    fn faster_side_acts_first() {
        let attacker = combatant("a", 10_000, 20, 10, 5);
        let defender = combatant("d", 10_000, 20, 10, 9);

        let outcome = resolve(attacker, defender, &mut RollStream::new(1));
        assert_eq!(outcome.log[0].actor, Side::Defender);
        assert_eq!(outcome.log[1].actor, Side::Attacker);
    }

    #[test]
    fn alternating_order_gives_one_action_per_turn() {
        let config = CombatConfig::default().with_turn_order(TurnOrder::Alternating);
        let attacker = combatant("a", 10_000, 20, 10, 1);
        let defender = combatant("d", 10_000, 20, 10, 50);

        let outcome = resolve_combat(
            attacker,
            defender,
            &config,
            &EffectConfig::default(),
            &mut RollStream::new(9),
        )
        .expect("valid");

        assert_eq!(outcome.log.len(), 10);
        for record in &outcome.log {
            let expected = if record.turn % 2 == 1 {
                Side::Attacker
            } else {
                Side::Defender
            };
            assert_eq!(record.actor, expected);
        }
    }

    #[test]
    fn frozen_combatant_skips_and_thaws() {
        let config = CombatConfig::default().with_turn_order(TurnOrder::Alternating);
        let mut attacker = combatant("a", 10_000, 20, 10, 10);
        attacker.effects.push(StatusEffect::new(EffectKind::Freeze, 0, 1, false));
        let defender = combatant("d", 10_000, 20, 10, 5);

        let outcome = resolve_combat(
            attacker,
            defender,
            &config,
            &EffectConfig::default(),
            &mut RollStream::new(4),
        )
        .expect("valid");

        assert_eq!(
            outcome.log[0].action,
            TurnAction::Skipped {
                cause: EffectKind::Freeze
            }
        );
        assert_eq!(outcome.log[0].damage, 0);
        assert_eq!(outcome.log[2].action, TurnAction::Strike);
    }

    #[test]
    fn burn_can_finish_the_holder() {
        let mut attacker = combatant("a", 3, 20, 10, 10);
        attacker.effects.push(StatusEffect::new(EffectKind::Burn, 5, 3, true));
        let defender = combatant("d", 10_000, 20, 10, 5);

        let outcome = resolve(attacker, defender, &mut RollStream::new(2));
        assert_eq!(outcome.log[0].action, TurnAction::Succumbed);
        assert_eq!(outcome.log[0].effect_tick.damage, 3);
        assert_eq!(
            outcome.end,
            CombatEnd::Defeat {
                loser: Side::Attacker
            }
        );
    }

    #[test]
    fn multi_strike_spends_stamina() {
        // 0 → variance 80%, multi fires, strike count clamps to 2.
        let attacker = combatant("a", 10_000, 20, 10, 10)
            .with_rates(SkillRates::NONE.with_multi_strike(100));
        let defender = combatant("d", 10_000, 20, 10, 5);

        let outcome = resolve(attacker, defender, &mut FixedRolls::constant(0));
        let first = &outcome.log[0];
        assert!(first.is_multi_strike);
        assert_eq!(first.strike_count, 2);
        assert_eq!(first.stamina_spent, 10);
        // hit 8, plus one extra strike at 30% of 8 = 2
        assert_eq!(first.damage, 10);
    }

    #[test]
    fn lifesteal_and_debuffs_land() {
        let rates = SkillRates::NONE
            .with_life_steal(100)
            .with_burn(100)
            .with_stun(100);
        let attacker = combatant("a", 1_000, 50, 0, 10)
            .with_vitals(900, 100)
            .with_rates(rates);
        let defender = combatant("d", 10_000, 10, 0, 5);

        let outcome = resolve(attacker, defender, &mut FixedRolls::constant(0));
        let first = &outcome.log[0];
        // 80% of 50 = 40 dealt, 25% stolen
        assert_eq!(first.damage, 40);
        assert_eq!(first.life_stolen, 10);
        assert_eq!(first.effects_applied, vec![EffectKind::Burn, EffectKind::Stun]);

        // Stunned defender loses its first action.
        assert!(matches!(outcome.log[1].action, TurnAction::Skipped { .. }));
    }

    #[test]
    fn health_stays_in_bounds_and_fight_terminates() {
        let rates = SkillRates {
            critical: 30,
            counter_attack: 30,
            multi_strike: 30,
            life_steal: 30,
            health_regen: 30,
            burn: 30,
            poison: 30,
            freeze: 20,
            stun: 20,
        };
        let attacker = combatant("a", 400, 60, 10, 10).with_rates(rates);
        let defender = combatant("d", 500, 50, 15, 10).with_rates(rates);

        for seed in 0..200 {
            let outcome = resolve(attacker.clone(), defender.clone(), &mut RollStream::new(seed));
            assert!(outcome.turns <= CombatConfig::DEFAULT_MAX_TURNS);
            for record in &outcome.log {
                assert!(record.attacker_health <= 400);
                assert!(record.defender_health <= 500);
                assert!(record.turn <= CombatConfig::DEFAULT_MAX_TURNS);
            }
            if outcome.end != CombatEnd::Timeout {
                assert!(outcome.attacker.is_defeated() || outcome.defender.is_defeated());
            }
        }
    }

    #[test]
    fn same_seed_replays_identically() {
        let rates = SkillRates::NONE.with_critical(40).with_burn(40);
        let attacker = combatant("a", 300, 40, 10, 10).with_rates(rates);
        let defender = combatant("d", 300, 40, 10, 10).with_rates(rates);

        let first = resolve(attacker.clone(), defender.clone(), &mut RollStream::new(77));
        let second = resolve(attacker, defender, &mut RollStream::new(77));
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_combatants_rejected() {
        let attacker = combatant("a", 100, 10, 10, 10);
        let downed = combatant("d", 100, 10, 10, 10).with_vitals(0, 10);

        let err = resolve_combat(
            attacker,
            downed,
            &CombatConfig::default(),
            &EffectConfig::default(),
            &mut FixedRolls::constant(0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidCombatant {
                side: Side::Defender,
                fault: CombatantFault::AlreadyDefeated
            }
        );
    }
}
