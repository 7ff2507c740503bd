//! In-memory DocumentStore implementation for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::repository::{Document, DocumentStore, Fields, Filter, Result, StoreError};

type Collection = BTreeMap<String, Document>;

/// In-memory implementation of [`DocumentStore`].
///
/// Can be switched offline to exercise the degraded paths that real
/// network stores hit.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    offline: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.check_online()?;
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        self.check_online()?;
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, collection: &str, id: &str, fields: Fields) -> Result<Document> {
        self.check_online()?;
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let docs = collections.entry(collection.to_owned()).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_owned(),
                id: id.to_owned(),
            });
        }

        let document = Document {
            id: id.to_owned(),
            version: 1,
            fields,
        };
        docs.insert(id.to_owned(), document.clone());
        Ok(document)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
        expected_version: Option<u64>,
    ) -> Result<Document> {
        self.check_online()?;
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        if let Some(expected) = expected_version {
            if document.version != expected {
                return Err(StoreError::VersionConflict {
                    collection: collection.to_owned(),
                    id: id.to_owned(),
                    expected,
                    actual: document.version,
                });
            }
        }

        document.fields.extend(patch);
        document.version += 1;
        Ok(document.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.check_online()?;
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(collection, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[tokio::test]
    async fn create_get_update_delete() {
        let store = InMemoryDocumentStore::new();
        let created = store
            .create("characters", "c1", fields(json!({"level": 1, "qi": 0})))
            .await
            .unwrap();
        assert_eq!(created.version, 1);

        let updated = store
            .update("characters", "c1", fields(json!({"qi": 50})), Some(1))
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.fields.get("level"), Some(&json!(1)));
        assert_eq!(updated.fields.get("qi"), Some(&json!(50)));

        store.delete("characters", "c1").await.unwrap();
        assert!(store.get("characters", "c1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_version_conflicts() {
        let store = InMemoryDocumentStore::new();
        store.create("characters", "c1", Fields::new()).await.unwrap();
        store
            .update("characters", "c1", Fields::new(), Some(1))
            .await
            .unwrap();

        let err = store
            .update("characters", "c1", Fields::new(), Some(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert!(err.severity().is_recoverable());
    }

    #[tokio::test]
    async fn duplicate_create_and_missing_update() {
        let store = InMemoryDocumentStore::new();
        store.create("c", "x", Fields::new()).await.unwrap();
        assert!(matches!(
            store.create("c", "x", Fields::new()).await,
            Err(StoreError::AlreadyExists { .. })
        ));
        assert!(
            store
                .update("c", "y", Fields::new(), None)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn list_filters_by_field() {
        let store = InMemoryDocumentStore::new();
        store
            .create("server_events", "a", fields(json!({"active": true})))
            .await
            .unwrap();
        store
            .create("server_events", "b", fields(json!({"active": false})))
            .await
            .unwrap();

        let active = store
            .list("server_events", &Filter::eq("active", true))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");
        assert_eq!(store.list("server_events", &Filter::all()).await.unwrap().len(), 2);
        assert!(store.list("nothing", &Filter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn offline_store_is_unavailable() {
        let store = InMemoryDocumentStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.get("c", "x").await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_offline(false);
        assert!(store.get("c", "x").await.unwrap().is_none());
    }
}
