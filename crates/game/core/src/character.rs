//! Character snapshot - the persisted view of a cultivator the engine reads.

use crate::combat::CombatantState;
use crate::error::Result;
use crate::stats::{BaseCombatStats, CultivationPath, StatTable};

/// Plain-data view of a character as stored by the document collaborator.
///
/// The engine never mutates a snapshot; services build a new one from the
/// accrual and combat results and write it back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSnapshot {
    pub id: String,
    pub name: String,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: CultivationPath,
    /// Carried cultivation resource.
    #[cfg_attr(feature = "serde", serde(default))]
    pub qi: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub energy: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub currency: u64,
}

impl CharacterSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            path: CultivationPath::default(),
            qi: 0,
            energy: 0,
            currency: 0,
        }
    }

    pub fn with_path(mut self, path: CultivationPath) -> Self {
        self.path = path;
        self
    }

    pub fn with_qi(mut self, qi: u64) -> Self {
        self.qi = qi;
        self
    }

    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_currency(mut self, currency: u64) -> Self {
        self.currency = currency;
        self
    }

    pub fn base_stats(&self, table: &StatTable) -> Result<BaseCombatStats> {
        table.derive(self.level, self.path, self.qi)
    }

    /// Build a full-vitals combatant for this character.
    pub fn combatant(&self, table: &StatTable) -> Result<CombatantState> {
        let base = self.base_stats(table)?;
        Ok(CombatantState::from_base(
            self.id.clone(),
            self.name.clone(),
            &base,
        ))
    }
}
