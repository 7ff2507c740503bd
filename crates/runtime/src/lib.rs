//! Runtime orchestration for the cultivation engine.
//!
//! This crate wires the pure engine to a document store, serialises work per
//! character, and runs the background workers that persist progression and
//! expire presence. Consumers embed [`Runtime`] and call its services.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`services`] combine engine calls with storage (progression, trials)
//! - [`repository`] is the storage boundary and its in-memory implementation
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`presence`] is the expiring online registry
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod clock;
pub mod config;
pub mod events;
pub mod locks;
pub mod presence;
pub mod repository;
pub mod runtime;
pub mod services;

mod workers;

pub use api::{Result, RuntimeError, StoreError, TrialRejection};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RuntimeConfig;
pub use events::{CombatEvent, EventBus, GameEvent, PresenceEvent, ProgressionEvent, Topic};
pub use locks::{CharacterGuard, CharacterLocks};
pub use presence::{ExpiringStore, InMemoryExpiringStore, PresenceInfo};
pub use repository::{
    DocumentStore, Filter, InMemoryDocumentStore, Repositories, ServerEvent, TypedCollection,
    Versioned,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use services::{
    ProgressionService, RewardMultipliers, TrialAttempt, TrialReport, TrialService,
};
