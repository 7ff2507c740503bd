//! Presence registry: who is online, with expiry instead of logout.
//!
//! Entries are written with a TTL on every heartbeat and removed by a
//! periodic sweep once they lapse. Reads already treat lapsed entries as
//! absent, so the sweep only reclaims memory and announces departures.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use cultivation_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Key-value store whose entries expire.
pub trait ExpiringStore<V>: Send + Sync {
    /// Insert or replace `key`, expiring `ttl` after `now`.
    fn put(&self, key: &str, value: V, ttl: Duration, now: Timestamp);

    /// Value for `key` unless it has expired at `now`.
    fn get(&self, key: &str, now: Timestamp) -> Option<V>;

    fn remove(&self, key: &str) -> Option<V>;

    /// Remove every entry expired at `now`; returns their keys.
    fn sweep_expired(&self, now: Timestamp) -> Vec<String>;

    /// Live entries at `now`.
    fn live(&self, now: Timestamp) -> Vec<(String, V)>;
}

/// What the registry knows about an online character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceInfo {
    pub character_id: String,
    pub name: String,
    /// Free-form activity label ("cultivating", "trial:bandit_camp", ...).
    pub activity: String,
}

struct Entry<V> {
    value: V,
    expires_at: Timestamp,
}

/// In-memory implementation of [`ExpiringStore`].
pub struct InMemoryExpiringStore<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V> InMemoryExpiringStore<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for InMemoryExpiringStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ExpiringStore<V> for InMemoryExpiringStore<V>
where
    V: Clone + Send + Sync,
{
    fn put(&self, key: &str, value: V, ttl: Duration, now: Timestamp) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_owned(),
            Entry {
                value,
                expires_at: now.saturating_add(ttl),
            },
        );
    }

    fn get(&self, key: &str, now: Timestamp) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    fn remove(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key).map(|entry| entry.value)
    }

    fn sweep_expired(&self, now: Timestamp) -> Vec<String> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.remove(key);
        }
        expired
    }

    fn live(&self, now: Timestamp) -> Vec<(String, V)> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut live: Vec<_> = entries
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();
        live.sort_by(|a, b| a.0.cmp(&b.0));
        live
    }
}
