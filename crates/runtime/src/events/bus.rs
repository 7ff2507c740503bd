//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CombatEvent, PresenceEvent, ProgressionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Combat outcomes
    Combat,
    /// Accrual flushes
    Progression,
    /// Presence expiry
    Presence,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Combat(CombatEvent),
    Progression(ProgressionEvent),
    Presence(PresenceEvent),
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::Combat(_) => Topic::Combat,
            GameEvent::Progression(_) => Topic::Progression,
            GameEvent::Presence(_) => Topic::Presence,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning shares the underlying channels.
#[derive(Clone)]
pub struct EventBus {
    combat: broadcast::Sender<GameEvent>,
    progression: broadcast::Sender<GameEvent>,
    presence: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            combat: broadcast::channel(capacity).0,
            progression: broadcast::channel(capacity).0,
            presence: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<GameEvent> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Progression => &self.progression,
            Topic::Presence => &self.presence,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: GameEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
