//! Per-character serialisation of read-modify-write sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// Proof that the holder has exclusive access to one character.
///
/// Dropping the guard releases the character.
pub struct CharacterGuard {
    character_id: String,
    _guard: OwnedMutexGuard<()>,
}

impl CharacterGuard {
    pub fn character_id(&self) -> &str {
        &self.character_id
    }
}

/// Registry of async mutexes keyed by character id.
///
/// Combat, accrual and flushes for the same character never interleave;
/// different characters proceed in parallel.
#[derive(Default)]
pub struct CharacterLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, character_id: &str) -> CharacterGuard {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(character_id.to_owned()).or_default())
        };
        CharacterGuard {
            character_id: character_id.to_owned(),
            _guard: mutex.lock_owned().await,
        }
    }

    /// Drop registry entries nobody holds or waits on.
    pub fn prune(&self) -> usize {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let before = locks.len();
        locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        before - locks.len()
    }

    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
