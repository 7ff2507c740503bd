//! Stat Model - derives base combat stats from level and cultivation path.
//!
//! # Architecture
//!
//! ```text
//! [ CharacterSnapshot: level, path, carried qi ]
//!      ↓  StatTable::derive (pure)
//! [ BaseCombatStats ]
//!      ↓  CombatantState::from_base
//! [ Combat Resolver ]
//! ```
//!
//! ## Principles
//!
//! 1. **Deterministic**: same `(level, path, qi)` always yields the same stats
//! 2. **Integer math**: percentages are integers, results are floored
//! 3. **Tables, not formulas, for identity**: path multipliers and skill
//!    rates are lookup tables so balance can change without code changes

pub mod derived;
pub mod path;
pub mod rates;

pub use derived::{BaseCombatStats, CultivationBonus, StatGrowth, StatTable, derive_combat_stats};
pub use path::{CultivationPath, PathMultipliers, PathProfile, PathTable};
pub use rates::SkillRates;
