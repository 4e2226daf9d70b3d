use thiserror::Error;

use crate::EntityId;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity is stored under the key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// A find-all was issued against an empty store.
    #[error("No {entity} stored")]
    Empty { entity: &'static str },

    /// An insert used a key that is already taken.
    #[error("Duplicate {entity} key: {id}")]
    DuplicateKey { entity: &'static str, id: EntityId },

    /// An update targeted a key that is not stored.
    #[error("Cannot update {entity} {id}: not stored")]
    UpdateMissing { entity: &'static str, id: EntityId },

    /// The underlying storage rejected the write.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
