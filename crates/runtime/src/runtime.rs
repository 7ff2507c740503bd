//! High-level runtime orchestrator.
//!
//! The runtime owns the services and background workers and exposes a
//! builder-based API for clients. Dropping it without calling
//! [`Runtime::shutdown`] loses pending progression.

use std::sync::Arc;

use cultivation_content::{ContentFactory, TrialCatalog};
use cultivation_core::{CharacterSnapshot, EngineConfig};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{Result, RuntimeError};
use crate::clock::{Clock, SystemClock};
use crate::config::RuntimeConfig;
use crate::events::{EventBus, GameEvent, Topic};
use crate::locks::CharacterLocks;
use crate::presence::{ExpiringStore, InMemoryExpiringStore, PresenceInfo};
use crate::repository::{DocumentStore, Repositories};
use crate::services::{ProgressionService, TrialAttempt, TrialService};
use crate::workers::{FlushWorker, PresenceSweeper, sweep_presence};

/// Main runtime: services plus their background workers.
pub struct Runtime {
    config: RuntimeConfig,
    engine: Arc<EngineConfig>,
    events: EventBus,
    clock: Arc<dyn Clock>,
    progression: Arc<ProgressionService>,
    trials: Arc<TrialService>,
    presence: Arc<dyn ExpiringStore<PresenceInfo>>,

    // Background workers
    shutdown_tx: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn progression(&self) -> &Arc<ProgressionService> {
        &self.progression
    }

    pub fn trials(&self) -> &Arc<TrialService> {
        &self.trials
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe(topic)
    }

    pub async fn create_character(&self, snapshot: &CharacterSnapshot) -> Result<()> {
        self.progression.create_character(snapshot).await
    }

    pub async fn character(&self, character_id: &str) -> Result<Option<CharacterSnapshot>> {
        self.progression.snapshot(character_id).await
    }

    pub async fn attempt_trial(&self, character_id: &str, trial_id: &str) -> Result<TrialAttempt> {
        self.trials.attempt(character_id, trial_id).await
    }

    /// Mark a character online for another TTL.
    pub fn heartbeat(&self, info: PresenceInfo) {
        let key = info.character_id.clone();
        self.presence
            .put(&key, info, self.config.presence_ttl, self.clock.now());
    }

    /// Characters whose presence has not lapsed.
    pub fn online(&self) -> Vec<PresenceInfo> {
        self.presence
            .live(self.clock.now())
            .into_iter()
            .map(|(_, info)| info)
            .collect()
    }

    /// Run one presence sweep now instead of waiting for the worker.
    pub fn sweep_presence(&self) -> usize {
        sweep_presence(self.presence.as_ref(), self.clock.as_ref(), &self.events)
    }

    /// Stop the workers and write all pending progression.
    pub async fn shutdown(self) -> Result<usize> {
        // Receivers may already be gone if a worker exited early.
        let _ = self.shutdown_tx.send(true);

        for worker in self.workers {
            worker.await.map_err(RuntimeError::WorkerJoin)?;
        }

        let flushed = self.progression.shutdown().await?;
        info!(flushed, "runtime shut down");
        Ok(flushed)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn DocumentStore>>,
    engine: Option<EngineConfig>,
    catalog: Option<TrialCatalog>,
    clock: Option<Arc<dyn Clock>>,
    presence: Option<Arc<dyn ExpiringStore<PresenceInfo>>>,
    seed: Option<u64>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            engine: None,
            catalog: None,
            clock: None,
            presence: None,
            seed: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required document store
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use these balance tables instead of loading `balance.toml`.
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Use this catalog instead of loading `trials.ron`.
    pub fn trials(mut self, catalog: TrialCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn presence_store(mut self, store: Arc<dyn ExpiringStore<PresenceInfo>>) -> Self {
        self.presence = Some(store);
        self
    }

    /// Seed the fight-seed generator so trial outcomes repeat across runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the runtime and spawn its workers.
    pub async fn build(self) -> Result<Runtime> {
        let store = self.store.ok_or(RuntimeError::MissingStore)?;

        let factory = match &self.config.content_dir {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::bundled(),
        };
        let mut engine = match self.engine {
            Some(engine) => engine,
            None => factory
                .load_config()
                .map_err(|err| RuntimeError::Content(format!("{err:#}")))?,
        };
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => factory
                .load_trials()
                .map_err(|err| RuntimeError::Content(format!("{err:#}")))?,
        };
        self.config.apply_to(&mut engine);
        engine.validate()?;

        let engine = Arc::new(engine);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let presence = self
            .presence
            .unwrap_or_else(|| Arc::new(InMemoryExpiringStore::<PresenceInfo>::new()));
        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let repos = Repositories::new(store);

        let progression = Arc::new(ProgressionService::new(
            repos.clone(),
            Arc::new(CharacterLocks::new()),
            Arc::clone(&clock),
            engine.progression.clone(),
            engine.flush,
            events.clone(),
        ));

        let mut trials = TrialService::new(
            repos,
            Arc::clone(&progression),
            Arc::clone(&engine),
            Arc::new(catalog),
            events.clone(),
        )
        .with_cooldown_override(self.config.trial_cooldown);
        if let Some(seed) = self.seed {
            trials = trials.with_seed_source(seed);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let flush_worker = FlushWorker::new(
            Arc::clone(&progression),
            self.config.flush_period(&engine.flush),
            shutdown_rx.clone(),
        );
        let sweeper = PresenceSweeper::new(
            Arc::clone(&presence),
            Arc::clone(&clock),
            events.clone(),
            self.config.presence_sweep,
            shutdown_rx,
        );
        let workers = vec![
            tokio::spawn(async move {
                flush_worker.run().await;
            }),
            tokio::spawn(async move {
                sweeper.run().await;
            }),
        ];

        info!(
            trials = trials.catalog().len(),
            max_turns = engine.combat.max_turns,
            "runtime started"
        );

        Ok(Runtime {
            config: self.config,
            engine,
            events,
            clock,
            progression,
            trials: Arc::new(trials),
            presence,
            shutdown_tx,
            workers,
        })
    }
}
