use async_trait::async_trait;

use crate::{EntityId, Identifiable, Result, StoreError};

/// Anything that can be kept in a [`Repository`].
pub trait Entity: Identifiable + Clone + Send + Sync + 'static {
    /// Entity name used in error messages and logs (e.g., "Customer").
    const NAME: &'static str;
}

/// Keyed store for a single entity type.
///
/// All implementations must be thread-safe (Send + Sync). Writes to the same
/// key are serialized by the implementation.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Finds an entity by key.
    ///
    /// Fails with `NotFound` when nothing is stored under `id`.
    async fn find(&self, id: &EntityId) -> Result<E>;

    /// Returns every stored entity, ordered by key.
    ///
    /// Fails with `Empty` when the store holds nothing.
    async fn find_all(&self) -> Result<Vec<E>>;

    /// Inserts a new entity.
    ///
    /// Fails with `DuplicateKey` if the key is already taken.
    async fn insert(&self, entity: E) -> Result<()>;

    /// Replaces a stored entity.
    ///
    /// Fails with `UpdateMissing` if the key is not stored; an update never
    /// creates.
    async fn update(&self, entity: E) -> Result<()>;

    /// Removes an entity by key.
    ///
    /// Fails with `NotFound` when nothing is stored under `id`.
    async fn remove(&self, id: &EntityId) -> Result<()>;

    /// Returns a key that is not currently in use.
    async fn unique_id(&self) -> Result<EntityId>;
}

/// Extension trait providing convenience methods for repositories.
#[async_trait]
pub trait RepositoryExt<E: Entity>: Repository<E> {
    /// Checks if an entity is stored under `id`.
    async fn exists(&self, id: &EntityId) -> Result<bool> {
        match self.find(id).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns every stored entity, or an empty vec when the store is empty.
    async fn list(&self) -> Result<Vec<E>> {
        match self.find_all().await {
            Ok(all) => Ok(all),
            Err(StoreError::Empty { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

// Blanket implementation for all repositories
impl<E: Entity, T: Repository<E> + ?Sized> RepositoryExt<E> for T {}

/// A root entity together with the children it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord<P, C> {
    pub root: P,
    pub children: Vec<C>,
}

impl<P, C> AggregateRecord<P, C> {
    pub fn new(root: P, children: Vec<C>) -> Self {
        Self { root, children }
    }
}

/// Store for aggregates whose children live and die with their root.
///
/// Inserting and removing an aggregate is atomic: no reader ever observes a
/// root without its children or children without their root.
#[async_trait]
pub trait AggregateRepository<P: Entity, C: Entity>: Send + Sync {
    /// Finds an aggregate by root key.
    async fn find(&self, id: &EntityId) -> Result<AggregateRecord<P, C>>;

    /// Returns every stored aggregate, ordered by root key.
    ///
    /// Fails with `Empty` when the store holds nothing.
    async fn find_all(&self) -> Result<Vec<AggregateRecord<P, C>>>;

    /// Inserts a root and all of its children in one write.
    ///
    /// Fails with `DuplicateKey` if the root key or any child key is taken.
    async fn insert(&self, record: AggregateRecord<P, C>) -> Result<()>;

    /// Replaces the root of a stored aggregate, keeping its children.
    async fn update_root(&self, root: P) -> Result<()>;

    /// Removes a root and all of its children in one write.
    async fn remove(&self, id: &EntityId) -> Result<()>;

    /// Returns a root key that is not currently in use.
    async fn unique_id(&self) -> Result<EntityId>;
}
