//! Service error types.

use serde::{Deserialize, Serialize};
use store::StoreError;
use thiserror::Error;

use crate::validation::CheckError;

/// Errors returned by the customer, catalog and order services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A field or reference failed validation.
    #[error("{0}")]
    Check(#[from] CheckError),

    /// The identifier is empty or does not resolve.
    #[error("{entity} not found: {id}")]
    ObjectNotFound { entity: String, id: String },

    /// An insert used an identifier that is already taken.
    #[error("Duplicate {entity} key: {id}")]
    DuplicateKey { entity: String, id: String },

    /// Reading from the store failed.
    #[error("Find failed: {0}")]
    Find(String),

    /// Writing a new entity failed after validation passed.
    #[error("Create failed: {0}")]
    Create(String),

    /// Replacing an entity failed after validation passed.
    #[error("Update failed: {0}")]
    Update(String),

    /// Removing an entity failed.
    #[error("Remove failed: {0}")]
    Remove(String),
}

/// Discriminant of [`ServiceError`], stable across process boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Check,
    ObjectNotFound,
    DuplicateKey,
    Find,
    Create,
    Update,
    Remove,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Check(_) => ErrorKind::Check,
            ServiceError::ObjectNotFound { .. } => ErrorKind::ObjectNotFound,
            ServiceError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            ServiceError::Find(_) => ErrorKind::Find,
            ServiceError::Create(_) => ErrorKind::Create,
            ServiceError::Update(_) => ErrorKind::Update,
            ServiceError::Remove(_) => ErrorKind::Remove,
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ServiceError::ObjectNotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Maps a store failure raised while reading.
    pub(crate) fn on_find(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::not_found(entity, id),
            StoreError::Empty { entity } => Self::not_found(entity, ""),
            other => ServiceError::Find(other.to_string()),
        }
    }

    /// Maps a store failure raised while inserting.
    pub(crate) fn on_create(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { entity, id } => ServiceError::DuplicateKey {
                entity: entity.to_string(),
                id: id.into_inner(),
            },
            other => ServiceError::Create(other.to_string()),
        }
    }

    /// Maps a store failure raised while updating.
    pub(crate) fn on_update(err: StoreError) -> Self {
        match err {
            StoreError::UpdateMissing { entity, id } | StoreError::NotFound { entity, id } => {
                ServiceError::Check(CheckError::new(
                    "id",
                    format!("{entity} {id} does not exist"),
                ))
            }
            other => ServiceError::Update(other.to_string()),
        }
    }

    /// Maps a store failure raised while removing.
    pub(crate) fn on_remove(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::not_found(entity, id),
            other => ServiceError::Remove(other.to_string()),
        }
    }
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;
