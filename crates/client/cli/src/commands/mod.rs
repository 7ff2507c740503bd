//! Subcommand implementations.

mod accrue;
mod simulate;
mod stats;

use anyhow::{Context, Result};
use cultivation_content::{ContentFactory, TrialCatalog};
use cultivation_core::{CultivationPath, EngineConfig};
use cultivation_runtime::RuntimeConfig;

pub use accrue::{AccrueArgs, accrue};
pub use simulate::{SimulateArgs, simulate_trial};
pub use stats::{StatsArgs, stats};

/// Balance tables and trial catalog for this run.
pub struct Content {
    pub engine: EngineConfig,
    pub trials: TrialCatalog,
}

impl Content {
    pub fn load(config: &RuntimeConfig) -> Result<Self> {
        let factory = match &config.content_dir {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::bundled(),
        };
        let mut engine = factory.load_config().with_context(|| {
            format!("loading balance from {}", factory.data_dir().display())
        })?;
        config.apply_to(&mut engine);
        engine.validate()?;

        let trials = factory.load_trials().with_context(|| {
            format!("loading trials from {}", factory.data_dir().display())
        })?;

        tracing::debug!(
            dir = %factory.data_dir().display(),
            trials = trials.len(),
            "content loaded"
        );
        Ok(Self { engine, trials })
    }
}

pub fn list_trials(content: &Content) {
    println!(
        "{:<16} {:<22} {:>5} {:>6} {:>9} {:>8} {:>9}",
        "id", "name", "level", "energy", "cooldown", "qi", "currency"
    );
    for (id, trial) in content.trials.iter() {
        println!(
            "{:<16} {:<22} {:>5} {:>6} {:>8}s {:>8} {:>9}",
            id,
            trial.name,
            trial.min_level,
            trial.energy_cost,
            trial.cooldown_secs,
            trial.rewards.qi,
            trial.rewards.currency
        );
    }
}

pub(crate) fn parse_path(value: &str) -> std::result::Result<CultivationPath, String> {
    CultivationPath::parse(value).map_err(|err| err.to_string())
}
