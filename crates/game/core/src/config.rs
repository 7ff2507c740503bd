use crate::combat::CombatConfig;
use crate::effects::EffectConfig;
use crate::error::Result;
use crate::power::PowerTable;
use crate::progression::{FlushPolicy, ProgressionRates};
use crate::stats::StatTable;

/// Every balance number the engine reads, grouped by component.
///
/// `Default` yields the documented constants; content files override any
/// subset of fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub stats: StatTable,
    pub effects: EffectConfig,
    pub combat: CombatConfig,
    pub power: PowerTable,
    pub progression: ProgressionRates,
    pub flush: FlushPolicy,
}

impl EngineConfig {
    // ===== compile-time limits =====
    pub const MAX_STATUS_EFFECTS: usize = crate::effects::MAX_STATUS_EFFECTS;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    pub fn with_flush(mut self, flush: FlushPolicy) -> Self {
        self.flush = flush;
        self
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.combat.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::TurnOrder;

    #[test]
    fn defaults_match_documented_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.combat.max_turns, 10);
        assert_eq!(config.combat.turn_order, TurnOrder::Agility);
        assert_eq!(config.combat.crit_multiplier_pct, 150);
        assert_eq!(config.flush, FlushPolicy::new(15, 60));
        assert_eq!(config.progression.energy_per_hour, 10);
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_overrides_keep_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"combat":{"max_turns":4},"flush":{"interval_secs":30}}"#)
                .expect("valid json");
        assert_eq!(config.combat.max_turns, 4);
        assert_eq!(config.combat.variance_max_pct, 120);
        assert_eq!(config.flush.interval_secs, 30);
        assert_eq!(config.flush.amount_threshold, 60);
    }
}
