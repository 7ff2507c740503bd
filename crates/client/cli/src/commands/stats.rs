//! `stats`: derived stats and power score for a hypothetical character.

use anyhow::Result;
use clap::Args;
use cultivation_core::{CharacterSnapshot, CultivationPath, compute_power_score};

use super::{Content, parse_path};

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[arg(long, default_value_t = 1)]
    pub level: u32,
    #[arg(long, default_value_t = CultivationPath::Qi, value_parser = parse_path)]
    pub path: CultivationPath,
    #[arg(long, default_value_t = 0)]
    pub qi: u64,
    #[arg(long, default_value_t = 0)]
    pub currency: u64,
}

pub fn stats(content: &Content, args: StatsArgs) -> Result<()> {
    let character = CharacterSnapshot::new("preview", "Preview", args.level)
        .with_path(args.path)
        .with_qi(args.qi)
        .with_currency(args.currency);
    let base = character.base_stats(&content.engine.stats)?;
    let power = compute_power_score(&character, &base, &content.engine.power);
    let realm = content
        .engine
        .power
        .realm_for(args.level)
        .map_or("none", |realm| realm.name.as_str());

    println!("level {} {} ({realm})", args.level, args.path);
    println!("  max health   {}", base.max_health);
    println!("  max stamina  {}", base.max_stamina);
    println!("  attack       {}", base.attack);
    println!("  defense      {}", base.defense);
    println!("  agility      {}", base.agility);
    let rates = base.rates;
    println!(
        "  rates        crit {}% counter {}% multi {}% steal {}% regen {}%",
        rates.critical, rates.counter_attack, rates.multi_strike, rates.life_steal, rates.health_regen
    );
    println!(
        "  on hit       burn {}% poison {}% freeze {}% stun {}%",
        rates.burn, rates.poison, rates.freeze, rates.stun
    );
    println!("power score {power}");
    Ok(())
}
