//! Unified error types surfaced by the runtime API.
//!
//! [`RuntimeError`] is an internal fault the caller cannot fix by changing
//! its request. Player-facing refusals are [`TrialRejection`] values and are
//! returned inside `Ok`.
use std::time::Duration;

use cultivation_core::{EngineError, ErrorSeverity};
use thiserror::Error;

pub use crate::repository::StoreError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("content error: {0}")]
    Content(String),

    #[error("background worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a document store to be configured before building")]
    MissingStore,
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Store(err) => err.severity(),
            Self::Engine(err) => err.severity(),
            Self::Content(_) | Self::MissingStore => ErrorSeverity::Validation,
            Self::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }
}

/// Why a trial attempt was refused. Shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrialRejection {
    #[error("not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("trial on cooldown for another {}s", remaining.as_secs())]
    CooldownActive { remaining: Duration },

    #[error("unknown trial '{trial_id}'")]
    InvalidTarget { trial_id: String },

    #[error("level {level} is below the required level {required}")]
    LevelTooLow { required: u32, level: u32 },

    #[error("character '{character_id}' not found")]
    CharacterNotFound { character_id: String },
}

impl TrialRejection {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientEnergy { .. } | Self::CooldownActive { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::InvalidTarget { .. }
            | Self::LevelTooLow { .. }
            | Self::CharacterNotFound { .. } => ErrorSeverity::Validation,
        }
    }

    /// Stable identifier for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientEnergy { .. } => "insufficient_energy",
            Self::CooldownActive { .. } => "cooldown_active",
            Self::InvalidTarget { .. } => "invalid_target",
            Self::LevelTooLow { .. } => "level_too_low",
            Self::CharacterNotFound { .. } => "character_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_message_shows_seconds() {
        let rejection = TrialRejection::CooldownActive {
            remaining: Duration::from_secs(120),
        };
        assert_eq!(rejection.to_string(), "trial on cooldown for another 120s");
        assert!(rejection.severity().is_recoverable());
        assert_eq!(rejection.code(), "cooldown_active");
    }

    #[test]
    fn store_severity_passes_through() {
        let err = RuntimeError::from(StoreError::Unavailable("down".into()));
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        let poisoned = RuntimeError::from(StoreError::LockPoisoned);
        assert!(poisoned.severity().is_internal());
    }
}
