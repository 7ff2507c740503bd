//! Lazy resource accrual with batched persistence.
//!
//! Reading a character credits the qi and energy earned since its clocks
//! last ran. Credited-but-unwritten progress is cached per character and
//! written when the [`FlushPolicy`] says so, by the flush worker, or on
//! shutdown. A crash loses at most one flush interval of accrual.
//!
//! Only characters with unwritten progress stay cached. Every load still
//! reads the character document, so changes made elsewhere are rebased
//! under the pending deltas and deleted characters are dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cultivation_core::{
    CharacterSnapshot, FlushPolicy, ProgressionClock, ProgressionRates, ResourceKind, Timestamp,
    accrue,
};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError, StoreError};
use crate::clock::Clock;
use crate::events::{EventBus, GameEvent, ProgressionEvent};
use crate::locks::{CharacterGuard, CharacterLocks};
use crate::repository::{CHARACTERS, Repositories, clock_id};

/// Mutation re-applied on top of a freshly read document after a conflict.
pub type Replay<'a> = &'a (dyn Fn(&mut CharacterSnapshot) + Send + Sync);

#[derive(Debug, Clone)]
struct PendingProgress {
    snapshot: CharacterSnapshot,
    version: u64,
    qi: ProgressionClock,
    energy: ProgressionClock,
}

impl PendingProgress {
    fn clock(&self, kind: ResourceKind) -> &ProgressionClock {
        match kind {
            ResourceKind::Qi => &self.qi,
            ResourceKind::Energy => &self.energy,
        }
    }

    fn has_unflushed(&self) -> bool {
        self.qi.unflushed > 0 || self.energy.unflushed > 0
    }

    fn flush_due(&self, policy: &FlushPolicy, now: Timestamp) -> bool {
        policy.should_flush(&self.qi, now) || policy.should_flush(&self.energy, now)
    }
}

pub struct ProgressionService {
    repos: Repositories,
    locks: Arc<CharacterLocks>,
    clock: Arc<dyn Clock>,
    rates: ProgressionRates,
    policy: FlushPolicy,
    events: EventBus,
    pending: Mutex<HashMap<String, PendingProgress>>,
}

impl ProgressionService {
    pub fn new(
        repos: Repositories,
        locks: Arc<CharacterLocks>,
        clock: Arc<dyn Clock>,
        rates: ProgressionRates,
        policy: FlushPolicy,
        events: EventBus,
    ) -> Self {
        Self {
            repos,
            locks,
            clock,
            rates,
            policy,
            events,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn locks(&self) -> &Arc<CharacterLocks> {
        &self.locks
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Persist a new character and start its clocks now.
    pub async fn create_character(&self, snapshot: &CharacterSnapshot) -> Result<()> {
        let _guard = self.locks.lock(&snapshot.id).await;
        let now = self.clock.now();
        self.repos.characters.create(&snapshot.id, snapshot).await?;
        for kind in ResourceKind::iter() {
            self.repos
                .clocks
                .put(
                    &clock_id(&snapshot.id, kind),
                    &ProgressionClock::started_at(now),
                )
                .await?;
        }
        info!(character = %snapshot.id, level = snapshot.level, "character created");
        Ok(())
    }

    /// Current view of a character with accrual applied.
    pub async fn snapshot(&self, character_id: &str) -> Result<Option<CharacterSnapshot>> {
        let guard = self.locks.lock(character_id).await;
        self.accrue_locked(&guard).await
    }

    /// Accrue for a character the caller already holds.
    ///
    /// Flushes when the policy says so; a failed flush is logged and left
    /// pending for the next attempt.
    pub async fn accrue_locked(&self, guard: &CharacterGuard) -> Result<Option<CharacterSnapshot>> {
        let id = guard.character_id();
        let now = self.clock.now();
        let Some(mut entry) = self.load_entry(id, now).await? else {
            return Ok(None);
        };
        self.accrue_entry(id, &mut entry, now);

        if entry.flush_due(&self.policy, now) {
            let mut flushed = entry.clone();
            match self.flush_entry(id, &mut flushed, now, None).await {
                Ok(()) => entry = flushed,
                Err(err) => {
                    warn!(character = %id, error = %err, "flush failed; progress stays pending")
                }
            }
        }

        let snapshot = entry.snapshot.clone();
        self.retain(id, entry);
        Ok(Some(snapshot))
    }

    /// Accrue, apply `mutate`, and write the result immediately.
    ///
    /// On a version conflict the document is re-read and the pending accrual
    /// plus `mutate` are replayed on top of it. Errors propagate: resource
    /// writes never fall back.
    pub async fn apply_locked(
        &self,
        guard: &CharacterGuard,
        mutate: Replay<'_>,
    ) -> Result<Option<CharacterSnapshot>> {
        let id = guard.character_id();
        let now = self.clock.now();
        let Some(mut entry) = self.load_entry(id, now).await? else {
            return Ok(None);
        };
        self.accrue_entry(id, &mut entry, now);
        mutate(&mut entry.snapshot);

        self.flush_entry(id, &mut entry, now, Some(mutate)).await?;
        let snapshot = entry.snapshot.clone();
        self.retain(id, entry);
        Ok(Some(snapshot))
    }

    /// Flush every cached character whose policy threshold has been reached.
    pub async fn flush_due(&self) -> usize {
        let now = self.clock.now();
        let due: Vec<String> = self
            .pending_entries()
            .into_iter()
            .filter(|(_, entry)| entry.flush_due(&self.policy, now))
            .map(|(id, _)| id)
            .collect();

        let mut flushed = 0;
        for id in due {
            match self.flush_one(&id, false).await {
                Ok(true) => flushed += 1,
                Ok(false) => {}
                Err(err) => warn!(character = %id, error = %err, "scheduled flush failed"),
            }
        }
        if flushed > 0 {
            debug!(flushed, "scheduled flush complete");
        }
        flushed
    }

    /// Flush everything pending regardless of policy.
    ///
    /// Attempts every character; returns the last error if any failed.
    pub async fn flush_all(&self) -> Result<usize> {
        let ids: Vec<String> = self
            .pending_entries()
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        let mut flushed = 0;
        let mut last_error = None;
        for id in ids {
            match self.flush_one(&id, true).await {
                Ok(true) => flushed += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(character = %id, error = %err, "final flush failed");
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) => Err(err),
            None => Ok(flushed),
        }
    }

    /// Teardown: write all pending progress.
    pub async fn shutdown(&self) -> Result<usize> {
        let flushed = self.flush_all().await?;
        info!(flushed, "progression service shut down");
        Ok(flushed)
    }

    /// Characters with accrued progress not yet written.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn flush_one(&self, id: &str, force: bool) -> Result<bool> {
        let guard = self.locks.lock(id).await;
        let now = self.clock.now();
        let Some(mut entry) = self.cached(guard.character_id()) else {
            return Ok(false);
        };
        let wanted = if force {
            entry.has_unflushed()
        } else {
            entry.flush_due(&self.policy, now)
        };
        if !wanted {
            return Ok(false);
        }

        match self.flush_entry(id, &mut entry, now, None).await {
            Ok(()) => {
                self.retain(id, entry);
                Ok(true)
            }
            Err(RuntimeError::Store(StoreError::NotFound { .. })) => {
                warn!(character = %id, "character deleted; dropping pending progress");
                self.evict(id);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    async fn load_entry(&self, id: &str, now: Timestamp) -> Result<Option<PendingProgress>> {
        let cached = self.cached(id);
        let character = match self.repos.characters.get(id).await {
            Ok(character) => character,
            Err(err) => match cached {
                Some(entry) => {
                    warn!(character = %id, error = %err, "store unreadable; using cached progress");
                    return Ok(Some(entry));
                }
                None => return Err(err.into()),
            },
        };

        let Some(character) = character else {
            if cached.is_some() {
                debug!(character = %id, "character deleted; dropping pending progress");
                self.evict(id);
            }
            return Ok(None);
        };

        if let Some(mut entry) = cached {
            if entry.version != character.version {
                debug!(
                    character = %id,
                    cached = entry.version,
                    stored = character.version,
                    "character changed in store; rebasing pending progress"
                );
                entry.snapshot = self.rebase(character.value, &entry);
                entry.version = character.version;
            }
            return Ok(Some(entry));
        }

        let qi = self.load_clock(id, ResourceKind::Qi, now).await?;
        let energy = self.load_clock(id, ResourceKind::Energy, now).await?;

        Ok(Some(PendingProgress {
            snapshot: character.value,
            version: character.version,
            qi,
            energy,
        }))
    }

    async fn load_clock(
        &self,
        id: &str,
        kind: ResourceKind,
        now: Timestamp,
    ) -> Result<ProgressionClock> {
        let key = clock_id(id, kind);
        if let Some(stored) = self.repos.clocks.get(&key).await? {
            return Ok(stored.value);
        }

        // Clean entries are not cached, so a missing clock must be stored
        // or the next load would start it again.
        let started = ProgressionClock::started_at(now);
        self.repos.clocks.put(&key, &started).await?;
        Ok(started)
    }

    fn accrue_entry(&self, id: &str, entry: &mut PendingProgress, now: Timestamp) {
        let level = entry.snapshot.level;

        let qi = accrue(
            &entry.qi,
            self.rates.qi_rate(level),
            self.rates.qi_capacity,
            entry.snapshot.qi,
            now,
        );
        entry.snapshot.qi = qi.amount;
        entry.qi = qi.clock;

        let energy = accrue(
            &entry.energy,
            self.rates.energy_rate(),
            self.rates.energy_capacity,
            u64::from(entry.snapshot.energy),
            now,
        );
        entry.snapshot.energy = u32::try_from(energy.amount).unwrap_or(u32::MAX);
        entry.energy = energy.clock;

        if qi.gained > 0 || energy.gained > 0 {
            debug!(
                character = %id,
                qi_gained = qi.gained,
                energy_gained = energy.gained,
                "accrued"
            );
        }
    }

    async fn flush_entry(
        &self,
        id: &str,
        entry: &mut PendingProgress,
        now: Timestamp,
        replay: Option<Replay<'_>>,
    ) -> Result<()> {
        for kind in ResourceKind::iter() {
            let mut stored = *entry.clock(kind);
            stored.mark_flushed(now);
            self.repos.clocks.put(&clock_id(id, kind), &stored).await?;
        }

        match self
            .repos
            .characters
            .update(id, &entry.snapshot, Some(entry.version))
            .await
        {
            Ok(saved) => entry.version = saved.version,
            Err(StoreError::VersionConflict { expected, actual, .. }) => {
                warn!(
                    character = %id,
                    expected,
                    actual,
                    "character changed concurrently; replaying pending progress"
                );
                let fresh = self
                    .repos
                    .characters
                    .get(id)
                    .await?
                    .ok_or_else(|| StoreError::not_found(CHARACTERS, id))?;

                let mut merged = self.rebase(fresh.value, entry);
                if let Some(mutate) = replay {
                    mutate(&mut merged);
                }

                let saved = self
                    .repos
                    .characters
                    .update(id, &merged, Some(fresh.version))
                    .await?;
                entry.snapshot = merged;
                entry.version = saved.version;
            }
            Err(err) => return Err(err.into()),
        }

        entry.qi.mark_flushed(now);
        entry.energy.mark_flushed(now);

        debug!(character = %id, qi = entry.snapshot.qi, energy = entry.snapshot.energy, "flushed");
        self.events
            .publish(GameEvent::Progression(ProgressionEvent::ResourcesFlushed {
                character_id: id.to_owned(),
                qi: entry.snapshot.qi,
                energy: entry.snapshot.energy,
            }));
        Ok(())
    }

    /// `fresh` with the entry's unwritten deltas credited on top.
    fn rebase(&self, mut fresh: CharacterSnapshot, entry: &PendingProgress) -> CharacterSnapshot {
        fresh.qi = credit(fresh.qi, entry.qi.unflushed, self.rates.qi_capacity);
        let energy = credit(
            u64::from(fresh.energy),
            entry.energy.unflushed,
            self.rates.energy_capacity,
        );
        fresh.energy = u32::try_from(energy).unwrap_or(u32::MAX);
        fresh
    }

    fn cached(&self, id: &str) -> Option<PendingProgress> {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.get(id).cloned()
    }

    /// Keep `entry` only while it holds unwritten progress.
    fn retain(&self, id: &str, entry: PendingProgress) {
        if !entry.has_unflushed() {
            self.evict(id);
            return;
        }
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.insert(id.to_owned(), entry);
    }

    fn evict(&self, id: &str) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.remove(id);
    }

    fn pending_entries(&self) -> Vec<(String, PendingProgress)> {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending
            .iter()
            .map(|(id, entry)| (id.clone(), entry.clone()))
            .collect()
    }
}

/// Add `delta` without crossing `capacity`; never lowers `current`.
fn credit(current: u64, delta: u64, capacity: u64) -> u64 {
    if current >= capacity {
        current
    } else {
        current.saturating_add(delta).min(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_respects_capacity() {
        assert_eq!(credit(95, 10, 100), 100);
        assert_eq!(credit(120, 10, 100), 120);
        assert_eq!(credit(10, 5, 100), 15);
    }
}
