//! Deterministic combat and progression rules for the cultivation game.
//!
//! `cultivation-core` defines the canonical engine (stat derivation, status
//! effects, combat resolution, power scoring, resource accrual, cooldowns)
//! as pure functions over explicit state. It performs no I/O, reads no
//! clock and owns no randomness source; the runtime supplies timestamps and
//! seeded rollers, so every result can be reproduced in tests.
pub mod character;
pub mod combat;
pub mod config;
pub mod cooldown;
pub mod effects;
pub mod error;
pub mod power;
pub mod progression;
pub mod rng;
pub mod stats;
pub mod time;

pub use character::CharacterSnapshot;
pub use combat::{
    CombatConfig, CombatEnd, CombatOutcome, CombatTurnRecord, CombatantState, Side, TurnAction,
    TurnOrder, resolve_combat,
};
pub use config::EngineConfig;
pub use cooldown::{CooldownDecision, CooldownRecord, can_act};
pub use effects::{
    EffectConfig, EffectKind, EffectTick, StackPolicy, StatusEffect, apply_effect_roll,
    tick_effects,
};
pub use error::{CombatantFault, EngineError, ErrorSeverity, Result};
pub use power::{PowerTable, RealmBonus, compute_power_score};
pub use progression::{
    Accrual, AccrualRate, FlushPolicy, ProgressionClock, ProgressionRates, ResourceKind, accrue,
};
pub use rng::{FixedRolls, PcgRng, RngOracle, RollStream, Roller, compute_seed};
pub use stats::{BaseCombatStats, CultivationPath, SkillRates, StatTable, derive_combat_stats};
pub use time::Timestamp;
