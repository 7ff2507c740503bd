//! Typed views over document collections.
//!
//! Values are (de)serialized with serde at this boundary, so malformed
//! documents surface as [`StoreError::Serialization`] instead of reaching
//! the engine.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Document, DocumentStore, Fields, Filter, Result, StoreError};

/// A value together with the document version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub id: String,
    pub version: u64,
    pub value: T,
}

/// One collection whose documents all decode to `T`.
pub struct TypedCollection<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name,
            _marker: PhantomData,
        }
    }
}

impl<T> TypedCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn get(&self, id: &str) -> Result<Option<Versioned<T>>> {
        match self.store.get(self.name, id).await? {
            Some(document) => decode(document).map(Some),
            None => Ok(None),
        }
    }

    pub async fn list(&self, filter: &Filter) -> Result<Vec<Versioned<T>>> {
        self.store
            .list(self.name, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn create(&self, id: &str, value: &T) -> Result<Versioned<T>> {
        let document = self.store.create(self.name, id, encode(value)?).await?;
        decode(document)
    }

    /// Overwrite every field of `value`, checking `expected_version` if given.
    pub async fn update(
        &self,
        id: &str,
        value: &T,
        expected_version: Option<u64>,
    ) -> Result<Versioned<T>> {
        let document = self
            .store
            .update(self.name, id, encode(value)?, expected_version)
            .await?;
        decode(document)
    }

    /// Create or overwrite without a version check.
    pub async fn put(&self, id: &str, value: &T) -> Result<Versioned<T>> {
        match self.update(id, value, None).await {
            Err(StoreError::NotFound { .. }) => self.create(id, value).await,
            other => other,
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(self.name, id).await
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> Result<Versioned<T>> {
    let value = serde_json::from_value(Value::Object(document.fields))?;
    Ok(Versioned {
        id: document.id,
        version: document.version,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryDocumentStore;
    use cultivation_core::CharacterSnapshot;

    fn characters() -> TypedCollection<CharacterSnapshot> {
        TypedCollection::new(Arc::new(InMemoryDocumentStore::new()), "characters")
    }

    #[tokio::test]
    async fn round_trip_through_documents() {
        let repo = characters();
        let hero = CharacterSnapshot::new("c1", "Lin", 3).with_qi(40);
        let created = repo.create("c1", &hero).await.unwrap();
        assert_eq!(created.version, 1);

        let loaded = repo.get("c1").await.unwrap().unwrap();
        assert_eq!(loaded.value, hero);
    }

    #[tokio::test]
    async fn put_upserts() {
        let repo = characters();
        let hero = CharacterSnapshot::new("c1", "Lin", 3);
        assert_eq!(repo.put("c1", &hero).await.unwrap().version, 1);
        assert_eq!(repo.put("c1", &hero.with_energy(5)).await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn malformed_document_is_a_serialization_error() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let mut fields = Fields::new();
        fields.insert("level".into(), Value::String("high".into()));
        store.create("characters", "bad", fields).await.unwrap();

        let repo: TypedCollection<CharacterSnapshot> = TypedCollection::new(store, "characters");
        assert!(matches!(
            repo.get("bad").await,
            Err(StoreError::Serialization(_))
        ));
    }
}
