//! Services that combine the pure engine with storage.
//!
//! Every read-modify-write on a character runs under its
//! [`CharacterGuard`](crate::locks::CharacterGuard).

mod progression;
mod trials;

pub use progression::{ProgressionService, Replay};
pub use trials::{RewardMultipliers, TrialAttempt, TrialReport, TrialService};
