//! `accrue`: run a character through the in-memory runtime on a manual clock.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use cultivation_core::{CharacterSnapshot, CultivationPath, Timestamp};
use cultivation_runtime::{
    GameEvent, InMemoryDocumentStore, ManualClock, ProgressionEvent, Repositories, Runtime,
    RuntimeConfig, Topic,
};

use super::{Content, parse_path};

const CHARACTER_ID: &str = "demo";

#[derive(Args, Debug)]
pub struct AccrueArgs {
    #[arg(long, default_value_t = 1)]
    pub level: u32,
    #[arg(long, default_value_t = CultivationPath::Qi, value_parser = parse_path)]
    pub path: CultivationPath,
    #[arg(long, default_value_t = 0)]
    pub energy: u32,
    /// Simulated time to cultivate.
    #[arg(long, default_value_t = 30)]
    pub minutes: u64,
    /// Seconds between reads of the character.
    #[arg(long, default_value_t = 60)]
    pub step_secs: u64,
}

pub async fn accrue(content: Content, config: RuntimeConfig, args: AccrueArgs) -> Result<()> {
    let store = Arc::new(InMemoryDocumentStore::new());
    let repos = Repositories::new(store.clone());
    let clock = Arc::new(ManualClock::new(Timestamp::EPOCH));

    let runtime = Runtime::builder()
        .config(config)
        .store(store)
        .engine(content.engine)
        .trials(content.trials)
        .clock(clock.clone())
        .build()
        .await?;
    let mut flushes = runtime.subscribe(Topic::Progression);

    let hero = CharacterSnapshot::new(CHARACTER_ID, "Demo", args.level)
        .with_path(args.path)
        .with_energy(args.energy);
    runtime.create_character(&hero).await?;

    let step = args.step_secs.max(1);
    let total = args.minutes.saturating_mul(60);
    let mut elapsed = 0;
    println!("{:>8} {:>10} {:>7} {:>8}", "t", "qi", "energy", "stored");
    while elapsed < total {
        let advance = step.min(total - elapsed);
        clock.advance(Duration::from_secs(advance));
        elapsed += advance;

        let view = runtime
            .character(CHARACTER_ID)
            .await?
            .context("demo character vanished")?;

        let mut stored = None;
        while let Ok(event) = flushes.try_recv() {
            if let GameEvent::Progression(ProgressionEvent::ResourcesFlushed { qi, .. }) = event {
                stored = Some(qi);
            }
        }
        let stored = stored.map_or_else(|| "-".to_string(), |qi| qi.to_string());
        println!(
            "{:>7}s {:>10} {:>7} {:>8}",
            elapsed, view.qi, view.energy, stored
        );
    }

    let flushed = runtime.shutdown().await?;
    let stored = repos
        .characters
        .get(CHARACTER_ID)
        .await?
        .context("demo character missing from store")?;
    println!(
        "\nshutdown flushed {flushed} character(s); stored qi {} energy {} (version {})",
        stored.value.qi, stored.value.energy, stored.version
    );
    Ok(())
}
