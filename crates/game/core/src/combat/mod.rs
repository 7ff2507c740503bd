//! Combat resolution system.
//!
//! [`resolve_combat`] runs a bounded, turn-based fight between two
//! [`CombatantState`]s and returns a [`CombatOutcome`] with the full
//! append-only log. The resolver is pure: all randomness comes from the
//! caller's [`Roller`](crate::rng::Roller), so a fight replays from its seed.
//!
//! # Core Functions
//!
//! - `resolve_combat`: full encounter, turn order, terminal rules
//! - `base_damage` / `apply_variance` / `apply_critical`: hit damage
//! - `counter_damage`: reduced damage returned by the defender

pub mod combatant;
pub mod config;
pub mod damage;
pub mod record;
pub mod resolver;

pub use combatant::CombatantState;
pub use config::{CombatConfig, TurnOrder};
pub use damage::{
    apply_critical, apply_variance, base_damage, counter_damage, multi_strike_bonus,
};
pub use record::{CombatEnd, CombatOutcome, CombatTurnRecord, Side, TurnAction};
pub use resolver::resolve_combat;
