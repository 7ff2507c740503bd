//! Trial attempts: gate, fight, reward, record.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cultivation_content::{TrialCatalog, TrialTemplate};
use cultivation_core::{
    CharacterSnapshot, CombatOutcome, CooldownRecord, EngineConfig, RollStream, Timestamp, can_act,
    resolve_combat,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::ProgressionService;
use crate::api::{Result, TrialRejection};
use crate::events::{CombatEvent, EventBus, GameEvent};
use crate::repository::{Filter, Repositories};

const FULL_RATE_PCT: u32 = 100;

/// Result of a trial attempt that did not fail internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialAttempt {
    Completed(Box<TrialReport>),
    Rejected(TrialRejection),
}

impl TrialAttempt {
    pub fn report(&self) -> Option<&TrialReport> {
        match self {
            Self::Completed(report) => Some(report.as_ref()),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&TrialRejection> {
        match self {
            Self::Completed(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

impl From<TrialRejection> for TrialAttempt {
    fn from(rejection: TrialRejection) -> Self {
        Self::Rejected(rejection)
    }
}

/// Everything the client needs to show (and replay) a finished trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialReport {
    pub trial_id: String,
    /// Replays the fight through `RollStream::new(seed)`.
    pub seed: u64,
    pub outcome: CombatOutcome,
    pub qi_reward: u64,
    pub currency_reward: u64,
    pub energy_spent: u32,
    /// Character as written after the attempt.
    pub character: CharacterSnapshot,
}

/// Reward scaling from active server events, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardMultipliers {
    pub qi_pct: u32,
    pub currency_pct: u32,
}

impl RewardMultipliers {
    pub const FULL: Self = Self {
        qi_pct: FULL_RATE_PCT,
        currency_pct: FULL_RATE_PCT,
    };

    fn scale(amount: u64, pct: u32) -> u64 {
        let scaled = u128::from(amount) * u128::from(pct) / u128::from(FULL_RATE_PCT);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

pub struct TrialService {
    repos: Repositories,
    progression: Arc<ProgressionService>,
    engine: Arc<EngineConfig>,
    catalog: Arc<TrialCatalog>,
    events: EventBus,
    cooldown_override: Option<Duration>,
    seeds: Mutex<StdRng>,
}

impl TrialService {
    pub fn new(
        repos: Repositories,
        progression: Arc<ProgressionService>,
        engine: Arc<EngineConfig>,
        catalog: Arc<TrialCatalog>,
        events: EventBus,
    ) -> Self {
        Self {
            repos,
            progression,
            engine,
            catalog,
            events,
            cooldown_override: None,
            seeds: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use the same cooldown for every trial instead of each template's own.
    pub fn with_cooldown_override(mut self, cooldown: Option<Duration>) -> Self {
        self.cooldown_override = cooldown;
        self
    }

    /// Draw fight seeds from a fixed sequence.
    pub fn with_seed_source(mut self, seed: u64) -> Self {
        self.seeds = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn catalog(&self) -> &TrialCatalog {
        &self.catalog
    }

    /// Attempt `trial_id` as `character_id`.
    ///
    /// Player-facing refusals come back as [`TrialAttempt::Rejected`].
    /// `Err` means the attempt failed internally and no resources were
    /// charged. The cooldown is recorded before the resource commit and
    /// restored if that commit fails; if the restore fails too, the trial
    /// stays on cooldown without having paid out.
    pub async fn attempt(&self, character_id: &str, trial_id: &str) -> Result<TrialAttempt> {
        let Some(trial) = self.catalog.get(trial_id) else {
            return Ok(TrialRejection::InvalidTarget {
                trial_id: trial_id.to_owned(),
            }
            .into());
        };

        let guard = self.progression.locks().lock(character_id).await;
        let Some(character) = self.progression.accrue_locked(&guard).await? else {
            return Ok(TrialRejection::CharacterNotFound {
                character_id: character_id.to_owned(),
            }
            .into());
        };

        let now = self.progression.now();
        let key = cooldown_key(character_id, trial_id);
        let previous = self.repos.cooldowns.get(&key).await?.map(|r| r.value);
        if let Some(rejection) = self.gate(&character, trial, previous.as_ref(), now) {
            debug!(character = %character_id, trial = %trial_id, reason = rejection.code(), "trial rejected");
            return Ok(rejection.into());
        }

        let seed = self.next_seed();
        let player = character.combatant(&self.engine.stats)?;
        let enemy = trial.enemy_combatant(trial_id);
        let outcome = resolve_combat(
            player,
            enemy,
            &self.engine.combat,
            &self.engine.effects,
            &mut RollStream::new(seed),
        )?;

        let (qi_reward, currency_reward) = if outcome.rewards_eligible() {
            let multipliers = self.reward_multipliers().await;
            (
                RewardMultipliers::scale(trial.rewards.qi, multipliers.qi_pct),
                RewardMultipliers::scale(trial.rewards.currency, multipliers.currency_pct),
            )
        } else {
            (0, 0)
        };

        let energy_cost = trial.energy_cost;
        let settle = move |snapshot: &mut CharacterSnapshot| {
            snapshot.energy = snapshot.energy.saturating_sub(energy_cost);
            snapshot.qi = snapshot.qi.saturating_add(qi_reward);
            snapshot.currency = snapshot.currency.saturating_add(currency_reward);
        };
        let record = CooldownRecord::new(character_id, trial_id, now);
        self.repos.cooldowns.put(&key, &record).await?;

        let character = match self.progression.apply_locked(&guard, &settle).await {
            Ok(Some(character)) => character,
            Ok(None) => {
                self.restore_cooldown(&key, previous.as_ref()).await;
                return Ok(TrialRejection::CharacterNotFound {
                    character_id: character_id.to_owned(),
                }
                .into());
            }
            Err(err) => {
                self.restore_cooldown(&key, previous.as_ref()).await;
                return Err(err);
            }
        };
        drop(guard);

        info!(
            character = %character_id,
            trial = %trial_id,
            winner = %outcome.winner,
            turns = outcome.turns,
            seed,
            qi_reward,
            currency_reward,
            "trial resolved"
        );
        self.events
            .publish(GameEvent::Combat(CombatEvent::TrialResolved {
                character_id: character_id.to_owned(),
                trial_id: trial_id.to_owned(),
                winner: outcome.winner,
                turns: outcome.turns,
                seed,
                qi_reward,
                currency_reward,
            }));

        Ok(TrialAttempt::Completed(Box::new(TrialReport {
            trial_id: trial_id.to_owned(),
            seed,
            outcome,
            qi_reward,
            currency_reward,
            energy_spent: energy_cost,
            character,
        })))
    }

    /// Remaining cooldown for `(character, trial)`, zero when ready.
    pub async fn cooldown_remaining(&self, character_id: &str, trial_id: &str) -> Result<Duration> {
        let Some(trial) = self.catalog.get(trial_id) else {
            return Ok(Duration::ZERO);
        };
        let record = self
            .repos
            .cooldowns
            .get(&cooldown_key(character_id, trial_id))
            .await?;
        let decision = can_act(
            record.as_ref().map(|r| &r.value),
            self.progression.now(),
            self.cooldown_for(trial),
        );
        Ok(decision.remaining)
    }

    /// Highest multiplier among active server events.
    ///
    /// Falls back to full rate when the store cannot be read.
    pub async fn reward_multipliers(&self) -> RewardMultipliers {
        match self
            .repos
            .server_events
            .list(&Filter::eq("active", true))
            .await
        {
            Ok(events) => events.iter().fold(RewardMultipliers::FULL, |acc, event| {
                RewardMultipliers {
                    qi_pct: acc.qi_pct.max(event.value.qi_multiplier_pct),
                    currency_pct: acc.currency_pct.max(event.value.currency_multiplier_pct),
                }
            }),
            Err(err) => {
                warn!(error = %err, "server events unavailable; using base rewards");
                RewardMultipliers::FULL
            }
        }
    }

    fn gate(
        &self,
        character: &CharacterSnapshot,
        trial: &TrialTemplate,
        cooldown: Option<&CooldownRecord>,
        now: Timestamp,
    ) -> Option<TrialRejection> {
        if character.level < trial.min_level {
            return Some(TrialRejection::LevelTooLow {
                required: trial.min_level,
                level: character.level,
            });
        }

        let decision = can_act(cooldown, now, self.cooldown_for(trial));
        if !decision.allowed {
            return Some(TrialRejection::CooldownActive {
                remaining: decision.remaining,
            });
        }

        if character.energy < trial.energy_cost {
            return Some(TrialRejection::InsufficientEnergy {
                required: trial.energy_cost,
                available: character.energy,
            });
        }

        None
    }

    /// Put back the cooldown that was in place before a failed commit.
    async fn restore_cooldown(&self, key: &str, previous: Option<&CooldownRecord>) {
        let restored = match previous {
            Some(record) => self.repos.cooldowns.put(key, record).await.map(|_| ()),
            None => self.repos.cooldowns.delete(key).await,
        };
        if let Err(err) = restored {
            warn!(key, error = %err, "cooldown rollback failed; trial stays on cooldown");
        }
    }

    fn cooldown_for(&self, trial: &TrialTemplate) -> Duration {
        self.cooldown_override.unwrap_or_else(|| trial.cooldown())
    }

    fn next_seed(&self) -> u64 {
        let mut seeds = self.seeds.lock().unwrap_or_else(|e| e.into_inner());
        seeds.r#gen()
    }
}

fn cooldown_key(character_id: &str, trial_id: &str) -> String {
    CooldownRecord::key(character_id, &format!("trial:{trial_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_scale_in_percent() {
        assert_eq!(RewardMultipliers::scale(100, 150), 150);
        assert_eq!(RewardMultipliers::scale(33, 100), 33);
        assert_eq!(RewardMultipliers::scale(u64::MAX, 200), u64::MAX);
    }

    #[test]
    fn cooldown_keys_are_namespaced() {
        assert_eq!(cooldown_key("c1", "bandit_camp"), "c1:trial:bandit_camp");
    }
}
