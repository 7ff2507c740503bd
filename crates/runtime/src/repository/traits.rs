//! Document store contract: the storage collaborator the services talk to.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::Result;

/// Field map of a document.
pub type Fields = Map<String, Value>;

/// Stored document with its optimistic-concurrency version.
///
/// Versions start at 1 on create and increase by one on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub version: u64,
    pub fields: Fields,
}

/// Equality filter used by [`DocumentStore::list`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    field: Option<(String, Value)>,
}

impl Filter {
    /// Match every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: Some((field.into(), value.into())),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match &self.field {
            None => true,
            Some((name, value)) => document.fields.get(name) == Some(value),
        }
    }
}

/// Document database offering CRUD by collection and id.
///
/// This is DYNAMIC data that changes during play: character snapshots,
/// progression clocks, cooldown records, server events.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Documents of `collection` matching `filter`, in id order.
    async fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;

    /// Fails with `AlreadyExists` when the id is taken.
    async fn create(&self, collection: &str, id: &str, fields: Fields) -> Result<Document>;

    /// Merge `patch` into an existing document.
    ///
    /// With `expected_version`, fails with `VersionConflict` unless the
    /// stored version matches.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
        expected_version: Option<u64>,
    ) -> Result<Document>;

    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}
