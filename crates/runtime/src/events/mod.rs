//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Delivery is best-effort: slow receivers lag and
//! publishing with no receivers is not an error.

mod bus;
mod types;

pub use bus::{EventBus, GameEvent, Topic};
pub use types::{CombatEvent, PresenceEvent, ProgressionEvent};
