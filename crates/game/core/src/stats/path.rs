//! Cultivation paths and their fixed archetype tables.

use super::rates::SkillRates;

/// Character archetype fixing stat-growth multipliers and base skill rates.
///
/// Parsing is case-insensitive: `"Body"`, `"body"` and `"BODY"` all map to
/// [`CultivationPath::Body`]. Anything else is rejected by
/// [`CultivationPath::parse`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CultivationPath {
    /// Balanced qi refinement.
    #[default]
    Qi,
    /// Body tempering: high health and defense, low agility.
    Body,
    /// Demonic arts: high attack and agility, low defense.
    Demon,
}

impl CultivationPath {
    /// Parse a path name, failing with [`EngineError::UnknownVariant`].
    ///
    /// [`EngineError::UnknownVariant`]: crate::EngineError::UnknownVariant
    pub fn parse(value: &str) -> crate::Result<Self> {
        value
            .parse()
            .map_err(|_| crate::EngineError::UnknownVariant {
                field: "cultivation_path",
                value: value.to_owned(),
            })
    }
}

/// Per-stat growth multipliers, in percent (150 = ×1.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathMultipliers {
    pub health: u32,
    pub stamina: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
}

/// Everything a path contributes to derived stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathProfile {
    pub multipliers: PathMultipliers,
    pub rates: SkillRates,
}

impl PathProfile {
    pub const QI: Self = Self {
        multipliers: PathMultipliers {
            health: 100,
            stamina: 120,
            attack: 100,
            defense: 100,
            agility: 100,
        },
        rates: SkillRates {
            critical: 10,
            counter_attack: 10,
            multi_strike: 10,
            life_steal: 5,
            health_regen: 5,
            burn: 10,
            poison: 5,
            freeze: 10,
            stun: 5,
        },
    };

    pub const BODY: Self = Self {
        multipliers: PathMultipliers {
            health: 150,
            stamina: 100,
            attack: 80,
            defense: 150,
            agility: 70,
        },
        rates: SkillRates {
            critical: 5,
            counter_attack: 25,
            multi_strike: 5,
            life_steal: 0,
            health_regen: 15,
            burn: 0,
            poison: 0,
            freeze: 5,
            stun: 15,
        },
    };

    pub const DEMON: Self = Self {
        multipliers: PathMultipliers {
            health: 80,
            stamina: 100,
            attack: 140,
            defense: 60,
            agility: 130,
        },
        rates: SkillRates {
            critical: 25,
            counter_attack: 5,
            multi_strike: 15,
            life_steal: 20,
            health_regen: 0,
            burn: 10,
            poison: 20,
            freeze: 0,
            stun: 5,
        },
    };
}

/// Lookup table from path to profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathTable {
    pub qi: PathProfile,
    pub body: PathProfile,
    pub demon: PathProfile,
}

impl PathTable {
    pub fn profile(&self, path: CultivationPath) -> &PathProfile {
        match path {
            CultivationPath::Qi => &self.qi,
            CultivationPath::Body => &self.body,
            CultivationPath::Demon => &self.demon,
        }
    }
}

impl Default for PathTable {
    fn default() -> Self {
        Self {
            qi: PathProfile::QI,
            body: PathProfile::BODY,
            demon: PathProfile::DEMON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(CultivationPath::parse("Body").unwrap(), CultivationPath::Body);
        assert_eq!(CultivationPath::parse("demon").unwrap(), CultivationPath::Demon);
        assert_eq!(CultivationPath::Qi.to_string(), "qi");
    }

    #[test]
    fn rejects_unknown_path() {
        let err = CultivationPath::parse("sword").unwrap_err();
        assert_eq!(err.error_code(), "unknown_variant");
        assert_eq!(err.severity(), crate::ErrorSeverity::Validation);
    }

    #[test]
    fn archetypes_keep_their_identity() {
        let table = PathTable::default();
        let body = table.profile(CultivationPath::Body);
        let demon = table.profile(CultivationPath::Demon);
        assert!(body.multipliers.defense > demon.multipliers.defense);
        assert!(demon.multipliers.attack > body.multipliers.attack);
        assert!(demon.rates.life_steal > body.rates.life_steal);
        assert!(body.rates.counter_attack > demon.rates.counter_attack);
    }
}
