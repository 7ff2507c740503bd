//! Error types raised by document store implementations.

use cultivation_core::ErrorSeverity;
use thiserror::Error;

/// Errors surfaced by [`DocumentStore`](super::DocumentStore) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    #[error("document {collection}/{id} changed concurrently: expected version {expected}, found {actual}")]
    VersionConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("document store lock was poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_owned(),
            id: id.to_owned(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::VersionConflict { .. } | Self::Unavailable(_) => ErrorSeverity::Recoverable,
            Self::NotFound { .. } | Self::AlreadyExists { .. } => ErrorSeverity::Validation,
            Self::Serialization(_) => ErrorSeverity::Internal,
            Self::LockPoisoned => ErrorSeverity::Fatal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
