//! Runtime configuration and environment loading.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use cultivation_core::{EngineConfig, FlushPolicy};

/// Operational settings for the runtime and its workers.
///
/// Balance numbers live in [`EngineConfig`]; this only covers how the
/// runtime schedules and stores them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory holding `balance.toml` and `trials.ron`. `None` uses the
    /// content bundled with the build.
    pub content_dir: Option<PathBuf>,
    /// Replaces the balance file's `flush.interval_secs` when set.
    pub flush_interval_secs: Option<u64>,
    /// Replaces the balance file's `flush.amount_threshold` when set.
    pub flush_amount: Option<u64>,
    /// How often the flush worker wakes up.
    pub flush_tick: Duration,
    pub presence_ttl: Duration,
    pub presence_sweep: Duration,
    /// Replaces every trial's own cooldown when set.
    pub trial_cooldown: Option<Duration>,
    /// Replaces the balance file's `combat.max_turns` when set.
    pub combat_max_turns: Option<u32>,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            flush_interval_secs: None,
            flush_amount: None,
            flush_tick: Duration::from_secs(5),
            presence_ttl: Duration::from_secs(60),
            presence_sweep: Duration::from_secs(15),
            trial_cooldown: None,
            combat_max_turns: None,
            event_buffer_size: 100,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CULTIVATION_CONTENT_DIR` - content directory (default: bundled data)
    /// - `FLUSH_INTERVAL_SECS` - max seconds between flushes (default: 15)
    /// - `FLUSH_AMOUNT` - accrued units that force a flush (default: 60)
    /// - `PRESENCE_TTL_SECS` - presence entry lifetime (default: 60)
    /// - `PRESENCE_SWEEP_SECS` - sweeper period (default: 15)
    /// - `TRIAL_COOLDOWN_SECS` - cooldown applied to every trial (default: per trial)
    /// - `COMBAT_MAX_TURNS` - turn cap per fight (default: from balance file)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("CULTIVATION_CONTENT_DIR") {
            if !dir.trim().is_empty() {
                config.content_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(secs) = read_env::<u64>("FLUSH_INTERVAL_SECS") {
            config.flush_interval_secs = Some(secs.max(1));
        }
        if let Some(amount) = read_env::<u64>("FLUSH_AMOUNT") {
            config.flush_amount = Some(amount);
        }
        if let Some(secs) = read_env::<u64>("PRESENCE_TTL_SECS") {
            config.presence_ttl = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("PRESENCE_SWEEP_SECS") {
            config.presence_sweep = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("TRIAL_COOLDOWN_SECS") {
            config.trial_cooldown = Some(Duration::from_secs(secs));
        }
        if let Some(turns) = read_env::<u32>("COMBAT_MAX_TURNS") {
            config.combat_max_turns = Some(turns.max(1));
        }

        config
    }

    /// Apply the overrides that belong in the engine tables.
    pub fn apply_to(&self, engine: &mut EngineConfig) {
        if let Some(secs) = self.flush_interval_secs {
            engine.flush.interval_secs = secs;
        }
        if let Some(amount) = self.flush_amount {
            engine.flush.amount_threshold = amount;
        }
        if let Some(turns) = self.combat_max_turns {
            engine.combat.max_turns = turns;
        }
    }

    /// Worker tick: never slower than the flush interval itself.
    pub fn flush_period(&self, policy: &FlushPolicy) -> Duration {
        self.flush_tick
            .min(policy.interval())
            .max(Duration::from_millis(100))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
