//! Persistence gateway: keyed storage of entities and of parent/children
//! aggregates that must be written and removed as one unit.

pub mod error;
pub mod memory;
pub mod repository;

pub use common::{EntityId, Identifiable};
pub use error::{Result, StoreError};
pub use memory::{InMemoryAggregateRepository, InMemoryRepository};
pub use repository::{AggregateRecord, AggregateRepository, Entity, Repository, RepositoryExt};
