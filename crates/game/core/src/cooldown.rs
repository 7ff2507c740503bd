//! Cooldown Gate - per-(actor, activity) rate limiting.

use core::time::Duration;

use crate::time::Timestamp;

/// Last time an actor performed an activity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownRecord {
    pub actor_id: String,
    pub activity_id: String,
    pub last_activity: Timestamp,
}

impl CooldownRecord {
    pub fn new(
        actor_id: impl Into<String>,
        activity_id: impl Into<String>,
        last_activity: Timestamp,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            activity_id: activity_id.into(),
            last_activity,
        }
    }

    /// Storage key for this `(actor, activity)` pair.
    pub fn key(actor_id: &str, activity_id: &str) -> String {
        format!("{actor_id}:{activity_id}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownDecision {
    pub allowed: bool,
    pub remaining: Duration,
}

impl CooldownDecision {
    pub const ALLOWED: Self = Self {
        allowed: true,
        remaining: Duration::ZERO,
    };
}

/// Decide whether the activity may run at `now`.
///
/// Pure: on success the caller writes a new record stamped `now`.
pub fn can_act(
    record: Option<&CooldownRecord>,
    now: Timestamp,
    cooldown: Duration,
) -> CooldownDecision {
    let Some(record) = record else {
        return CooldownDecision::ALLOWED;
    };

    let elapsed = now.saturating_elapsed_since(record.last_activity);
    if elapsed >= cooldown {
        CooldownDecision::ALLOWED
    } else {
        CooldownDecision {
            allowed: false,
            remaining: cooldown - elapsed,
        }
    }
}
