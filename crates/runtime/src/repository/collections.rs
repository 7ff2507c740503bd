//! Named collections and the records stored in them.

use std::sync::Arc;

use cultivation_core::{CharacterSnapshot, CooldownRecord, ProgressionClock, ResourceKind};
use serde::{Deserialize, Serialize};

use super::{DocumentStore, TypedCollection};

pub const CHARACTERS: &str = "characters";
pub const PROGRESSION_CLOCKS: &str = "progression_clocks";
pub const COOLDOWNS: &str = "cooldowns";
pub const SERVER_EVENTS: &str = "server_events";

/// Admin-controlled reward boost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEvent {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default = "full_rate")]
    pub qi_multiplier_pct: u32,
    #[serde(default = "full_rate")]
    pub currency_multiplier_pct: u32,
}

fn full_rate() -> u32 {
    100
}

/// Document id of a character's clock for one resource.
pub fn clock_id(character_id: &str, kind: ResourceKind) -> String {
    format!("{character_id}:{kind}")
}

/// Typed handles to every collection the services use.
#[derive(Clone)]
pub struct Repositories {
    pub characters: TypedCollection<CharacterSnapshot>,
    pub clocks: TypedCollection<ProgressionClock>,
    pub cooldowns: TypedCollection<CooldownRecord>,
    pub server_events: TypedCollection<ServerEvent>,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            characters: TypedCollection::new(Arc::clone(&store), CHARACTERS),
            clocks: TypedCollection::new(Arc::clone(&store), PROGRESSION_CLOCKS),
            cooldowns: TypedCollection::new(Arc::clone(&store), COOLDOWNS),
            server_events: TypedCollection::new(store, SERVER_EVENTS),
        }
    }
}
