//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Engine balance tables (data-driven via TOML)
//! - Trial catalog (data-driven via RON)
//!
//! Content is read once at startup and handed to the runtime services; it
//! never appears in persisted character state.

pub mod trials;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use trials::{EnemySpec, TrialCatalog, TrialRewards, TrialTemplate};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, TrialLoader};
