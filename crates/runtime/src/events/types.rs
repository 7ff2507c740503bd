//! Event types for different topics.

use cultivation_core::Side;
use serde::{Deserialize, Serialize};

/// Events about resolved fights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A trial fight finished (won or lost).
    TrialResolved {
        character_id: String,
        trial_id: String,
        winner: Side,
        turns: u32,
        /// Replays the fight through `RollStream::new(seed)`.
        seed: u64,
        qi_reward: u64,
        currency_reward: u64,
    },
}

/// Events about persisted resource progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// Pending accrual was written to the store.
    ResourcesFlushed {
        character_id: String,
        qi: u64,
        energy: u32,
    },
}

/// Events about the presence registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceEvent {
    /// A presence entry outlived its TTL and was swept.
    Expired { key: String },
}
