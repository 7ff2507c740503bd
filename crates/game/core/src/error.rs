//! Common error infrastructure for cultivation-core.
//!
//! Every engine entry point either returns plain data or fails with
//! [`EngineError`]. Running out of combat turns and clock skew are *not*
//! errors: the first is a terminal combat state, the second is clamped
//! locally by the accrual engine.
//!
//! # Design Principles
//!
//! - **No partial mutation**: an `Err` means the caller's state is untouched
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Stable codes**: [`EngineError::error_code`] feeds metrics and API payloads

use crate::combat::Side;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: Temporary conditions that may succeed on retry
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating corrupted state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry later or with different parameters.
    ///
    /// Examples: cooldown active, storage temporarily unavailable
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: level 0, unknown cultivation path, malformed combatant
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Reason a combatant snapshot was rejected by the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatantFault {
    /// `max_health` is zero.
    ZeroMaxHealth,
    /// `max_stamina` is zero.
    ZeroMaxStamina,
    /// `current_health` exceeds `max_health`.
    HealthAboveMax,
    /// `current_stamina` exceeds `max_stamina`.
    StaminaAboveMax,
    /// The combatant enters the fight already defeated.
    AlreadyDefeated,
}

/// Errors raised by engine entry points.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Level must be at least 1.
    #[error("invalid level {level}: must be at least 1")]
    InvalidLevel { level: u32 },

    /// A string did not name a known enum value (path, effect kind, ...).
    #[error("unknown {field} value '{value}'")]
    UnknownVariant { field: &'static str, value: String },

    /// A numeric input was outside its accepted range.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    /// A combatant snapshot violated the vitals invariants.
    #[error("invalid {side} combatant: {fault}")]
    InvalidCombatant { side: Side, fault: CombatantFault },
}

impl EngineError {
    /// Returns the severity level of this error.
    ///
    /// Every engine error is a validation failure: the engine has no
    /// internal state that could become inconsistent.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    /// Returns a static string identifier for this error variant.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLevel { .. } => "invalid_level",
            Self::UnknownVariant { .. } => "unknown_variant",
            Self::InvalidInput { .. } => "invalid_input",
            Self::InvalidCombatant { .. } => "invalid_combatant",
        }
    }
}

/// Result alias used across the engine.
pub type Result<T> = core::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_are_validation_failures() {
        let err = EngineError::InvalidCombatant {
            side: Side::Defender,
            fault: CombatantFault::ZeroMaxHealth,
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_recoverable());
        assert_eq!(err.error_code(), "invalid_combatant");
        assert_eq!(
            err.to_string(),
            "invalid defender combatant: zero_max_health"
        );
    }
}
