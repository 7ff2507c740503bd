//! Percentage skill rates.

/// Probability rates in percent.
///
/// Values are conceptually unbounded above 100 (callers clamp); the engine
/// treats anything ≥ 100 as "always".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillRates {
    pub critical: u32,
    pub counter_attack: u32,
    pub multi_strike: u32,
    pub life_steal: u32,
    pub health_regen: u32,
    pub burn: u32,
    pub poison: u32,
    pub freeze: u32,
    pub stun: u32,
}

impl SkillRates {
    /// All rates zero: no procs of any kind.
    pub const NONE: Self = Self {
        critical: 0,
        counter_attack: 0,
        multi_strike: 0,
        life_steal: 0,
        health_regen: 0,
        burn: 0,
        poison: 0,
        freeze: 0,
        stun: 0,
    };

    /// Clamp every rate into `[0, 100]`.
    pub fn clamped(self) -> Self {
        Self {
            critical: self.critical.min(100),
            counter_attack: self.counter_attack.min(100),
            multi_strike: self.multi_strike.min(100),
            life_steal: self.life_steal.min(100),
            health_regen: self.health_regen.min(100),
            burn: self.burn.min(100),
            poison: self.poison.min(100),
            freeze: self.freeze.min(100),
            stun: self.stun.min(100),
        }
    }

    pub fn with_critical(mut self, rate: u32) -> Self {
        self.critical = rate;
        self
    }

    pub fn with_counter_attack(mut self, rate: u32) -> Self {
        self.counter_attack = rate;
        self
    }

    pub fn with_multi_strike(mut self, rate: u32) -> Self {
        self.multi_strike = rate;
        self
    }

    pub fn with_life_steal(mut self, rate: u32) -> Self {
        self.life_steal = rate;
        self
    }

    pub fn with_health_regen(mut self, rate: u32) -> Self {
        self.health_regen = rate;
        self
    }

    pub fn with_burn(mut self, rate: u32) -> Self {
        self.burn = rate;
        self
    }

    pub fn with_poison(mut self, rate: u32) -> Self {
        self.poison = rate;
        self
    }

    pub fn with_freeze(mut self, rate: u32) -> Self {
        self.freeze = rate;
        self
    }

    pub fn with_stun(mut self, rate: u32) -> Self {
        self.stun = rate;
        self
    }
}
