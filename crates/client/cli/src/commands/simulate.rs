//! `simulate-trial`: one fight, printed turn by turn.

use anyhow::{Result, anyhow, bail};
use clap::Args;
use cultivation_core::{
    CharacterSnapshot, CombatEnd, CombatTurnRecord, CultivationPath, RollStream, TurnAction,
    resolve_combat,
};
use rand::Rng;

use super::{Content, parse_path};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Trial id from the catalog.
    #[arg(long)]
    pub trial: String,
    #[arg(long, default_value_t = 10)]
    pub level: u32,
    #[arg(long, default_value_t = CultivationPath::Qi, value_parser = parse_path)]
    pub path: CultivationPath,
    /// Carried qi (adds cultivation bonus stats).
    #[arg(long, default_value_t = 0)]
    pub qi: u64,
    /// Replay a specific fight instead of drawing a fresh seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn simulate_trial(content: &Content, args: SimulateArgs) -> Result<()> {
    let trial = content
        .trials
        .get(&args.trial)
        .ok_or_else(|| anyhow!("unknown trial '{}'", args.trial))?;
    if args.level < trial.min_level {
        bail!(
            "{} requires level {}, got {}",
            trial.name,
            trial.min_level,
            args.level
        );
    }

    let player = CharacterSnapshot::new("player", "Player", args.level)
        .with_path(args.path)
        .with_qi(args.qi)
        .combatant(&content.engine.stats)?;
    let enemy = trial.enemy_combatant(&args.trial);
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    println!(
        "{} (lv {} {}): hp {} atk {} def {} agi {}",
        player.name,
        args.level,
        args.path,
        player.max_health,
        player.attack,
        player.defense,
        player.agility
    );
    println!(
        "vs {}: hp {} atk {} def {} agi {}",
        enemy.name, enemy.max_health, enemy.attack, enemy.defense, enemy.agility
    );
    println!("seed {seed}\n");

    let outcome = resolve_combat(
        player,
        enemy,
        &content.engine.combat,
        &content.engine.effects,
        &mut RollStream::new(seed),
    )?;
    tracing::info!(trial = %args.trial, seed, winner = %outcome.winner, turns = outcome.turns, "simulated");

    for record in &outcome.log {
        println!("{}", describe(record));
    }

    let ending = match outcome.end {
        CombatEnd::Defeat { loser } => format!("{loser} defeated"),
        CombatEnd::DoubleKnockout => "both fell".to_string(),
        CombatEnd::Timeout => "time ran out".to_string(),
    };
    println!(
        "\n{} after {} turns: {} wins",
        ending, outcome.turns, outcome.winner
    );
    if outcome.rewards_eligible() {
        println!(
            "rewards: {} qi, {} currency",
            trial.rewards.qi, trial.rewards.currency
        );
    }
    Ok(())
}

fn describe(record: &CombatTurnRecord) -> String {
    let mut line = format!("[{:>2}] {:<14}", record.turn, record.actor_id);
    if record.effect_tick.damage > 0 {
        line.push_str(&format!(" takes {} over time,", record.effect_tick.damage));
    }
    if record.effect_tick.healing > 0 {
        line.push_str(&format!(" regenerates {},", record.effect_tick.healing));
    }

    match record.action {
        TurnAction::Succumbed => line.push_str(" succumbs"),
        TurnAction::Skipped { cause } => line.push_str(&format!(" is {cause} and loses the turn")),
        TurnAction::Strike => {
            line.push_str(&format!(" hits {} for {}", record.target_id, record.damage));
            if record.is_critical {
                line.push_str(" (critical)");
            }
            if record.is_multi_strike {
                line.push_str(&format!(" x{}", record.strike_count));
            }
            if record.life_stolen > 0 {
                line.push_str(&format!(", steals {}", record.life_stolen));
            }
            if record.is_counter {
                line.push_str(&format!(", countered for {}", record.counter_damage));
            }
            for effect in &record.effects_applied {
                line.push_str(&format!(", inflicts {effect}"));
            }
            for effect in &record.self_effects {
                line.push_str(&format!(", gains {effect}"));
            }
        }
    }

    line.push_str(&format!(
        "  [{} / {}]",
        record.attacker_health, record.defender_health
    ));
    line
}
