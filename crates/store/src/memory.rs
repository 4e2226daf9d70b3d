use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateRecord, AggregateRepository, Entity, EntityId, Repository, Result, StoreError,
};

/// In-memory repository for a single entity type.
///
/// Clones share the same underlying map.
#[derive(Clone)]
pub struct InMemoryRepository<E: Entity> {
    entities: Arc<RwLock<BTreeMap<EntityId, E>>>,
    fail_writes: Arc<AtomicBool>,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            entities: Arc::new(RwLock::new(BTreeMap::new())),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<E: Entity> InMemoryRepository<E> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entities.
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    /// Makes every subsequent write fail with `Unavailable` until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "{} store rejected the write",
                E::NAME
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn find(&self, id: &EntityId) -> Result<E> {
        self.entities
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: E::NAME,
                id: id.clone(),
            })
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        let entities = self.entities.read().await;
        if entities.is_empty() {
            return Err(StoreError::Empty { entity: E::NAME });
        }
        Ok(entities.values().cloned().collect())
    }

    async fn insert(&self, entity: E) -> Result<()> {
        self.check_writable()?;
        let mut entities = self.entities.write().await;
        let id = entity.id().clone();
        if entities.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                entity: E::NAME,
                id,
            });
        }
        tracing::debug!(entity = E::NAME, %id, "inserted");
        entities.insert(id, entity);
        Ok(())
    }

    async fn update(&self, entity: E) -> Result<()> {
        self.check_writable()?;
        let mut entities = self.entities.write().await;
        match entities.get_mut(entity.id()) {
            Some(stored) => {
                *stored = entity;
                Ok(())
            }
            None => Err(StoreError::UpdateMissing {
                entity: E::NAME,
                id: entity.id().clone(),
            }),
        }
    }

    async fn remove(&self, id: &EntityId) -> Result<()> {
        self.check_writable()?;
        let mut entities = self.entities.write().await;
        entities
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: E::NAME,
                id: id.clone(),
            })
    }

    async fn unique_id(&self) -> Result<EntityId> {
        let entities = self.entities.read().await;
        Ok(fresh_id(|id| entities.contains_key(id)))
    }
}

struct AggregateState<P, C> {
    records: BTreeMap<EntityId, AggregateRecord<P, C>>,
    child_ids: HashSet<EntityId>,
}

impl<P, C> Default for AggregateState<P, C> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            child_ids: HashSet::new(),
        }
    }
}

/// In-memory store for root/children aggregates.
///
/// A single lock guards roots and children together, so every insert and
/// remove is one atomic write.
#[derive(Clone)]
pub struct InMemoryAggregateRepository<P: Entity, C: Entity> {
    state: Arc<RwLock<AggregateState<P, C>>>,
    fail_writes: Arc<AtomicBool>,
}

impl<P: Entity, C: Entity> Default for InMemoryAggregateRepository<P, C> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(AggregateState::default())),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<P: Entity, C: Entity> InMemoryAggregateRepository<P, C> {
    /// Creates a new empty aggregate store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored roots.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    /// Returns the number of stored children across all roots.
    pub async fn child_count(&self) -> usize {
        self.state.read().await.child_ids.len()
    }

    /// Makes every subsequent write fail with `Unavailable` until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "{} store rejected the write",
                P::NAME
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<P: Entity, C: Entity> AggregateRepository<P, C> for InMemoryAggregateRepository<P, C> {
    async fn find(&self, id: &EntityId) -> Result<AggregateRecord<P, C>> {
        self.state
            .read()
            .await
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: P::NAME,
                id: id.clone(),
            })
    }

    async fn find_all(&self) -> Result<Vec<AggregateRecord<P, C>>> {
        let state = self.state.read().await;
        if state.records.is_empty() {
            return Err(StoreError::Empty { entity: P::NAME });
        }
        Ok(state.records.values().cloned().collect())
    }

    async fn insert(&self, record: AggregateRecord<P, C>) -> Result<()> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        let root_id = record.root.id().clone();
        if state.records.contains_key(&root_id) {
            return Err(StoreError::DuplicateKey {
                entity: P::NAME,
                id: root_id,
            });
        }

        // All keys are checked before anything is written
        let mut seen = HashSet::new();
        for child in &record.children {
            let child_id = child.id();
            if state.child_ids.contains(child_id) || !seen.insert(child_id.clone()) {
                return Err(StoreError::DuplicateKey {
                    entity: C::NAME,
                    id: child_id.clone(),
                });
            }
        }

        state.child_ids.extend(seen);
        tracing::debug!(
            entity = P::NAME,
            id = %root_id,
            children = record.children.len(),
            "inserted aggregate"
        );
        state.records.insert(root_id, record);
        Ok(())
    }

    async fn update_root(&self, root: P) -> Result<()> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        match state.records.get_mut(root.id()) {
            Some(record) => {
                record.root = root;
                Ok(())
            }
            None => Err(StoreError::UpdateMissing {
                entity: P::NAME,
                id: root.id().clone(),
            }),
        }
    }

    async fn remove(&self, id: &EntityId) -> Result<()> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        let record = state.records.remove(id).ok_or_else(|| StoreError::NotFound {
            entity: P::NAME,
            id: id.clone(),
        })?;
        for child in &record.children {
            state.child_ids.remove(child.id());
        }
        Ok(())
    }

    async fn unique_id(&self) -> Result<EntityId> {
        let state = self.state.read().await;
        Ok(fresh_id(|id| state.records.contains_key(id)))
    }
}

fn fresh_id(taken: impl Fn(&EntityId) -> bool) -> EntityId {
    loop {
        let id = EntityId::generate();
        if !taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Identifiable, RepositoryExt};

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        id: EntityId,
        label: String,
    }

    impl Widget {
        fn new(id: &str, label: &str) -> Self {
            Self {
                id: EntityId::new(id),
                label: label.to_string(),
            }
        }
    }

    impl Identifiable for Widget {
        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    impl Entity for Widget {
        const NAME: &'static str = "Widget";
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Part {
        id: EntityId,
    }

    impl Identifiable for Part {
        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    impl Entity for Part {
        const NAME: &'static str = "Part";
    }

    fn part(id: &str) -> Part {
        Part {
            id: EntityId::new(id),
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let repo = InMemoryRepository::new();
        repo.insert(Widget::new("w1", "first")).await.unwrap();

        let found = repo.find(&EntityId::new("w1")).await.unwrap();
        assert_eq!(found.label, "first");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn find_unknown_is_not_found() {
        let repo: InMemoryRepository<Widget> = InMemoryRepository::new();
        let result = repo.find(&EntityId::new("missing")).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "Widget", .. })));
    }

    #[tokio::test]
    async fn insert_duplicate_key_fails() {
        let repo = InMemoryRepository::new();
        repo.insert(Widget::new("w1", "first")).await.unwrap();
        let result = repo.insert(Widget::new("w1", "second")).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));

        let stored = repo.find(&EntityId::new("w1")).await.unwrap();
        assert_eq!(stored.label, "first");
    }

    #[tokio::test]
    async fn update_never_creates() {
        let repo = InMemoryRepository::new();
        let result = repo.update(Widget::new("w1", "ghost")).await;
        assert!(matches!(result, Err(StoreError::UpdateMissing { .. })));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let repo = InMemoryRepository::new();
        repo.insert(Widget::new("w1", "first")).await.unwrap();
        repo.update(Widget::new("w1", "renamed")).await.unwrap();
        assert_eq!(repo.find(&EntityId::new("w1")).await.unwrap().label, "renamed");
    }

    #[tokio::test]
    async fn find_all_on_empty_store_fails() {
        let repo: InMemoryRepository<Widget> = InMemoryRepository::new();
        assert!(matches!(repo.find_all().await, Err(StoreError::Empty { .. })));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_all_orders_by_key() {
        let repo = InMemoryRepository::new();
        repo.insert(Widget::new("b", "second")).await.unwrap();
        repo.insert(Widget::new("a", "first")).await.unwrap();

        let all = repo.find_all().await.unwrap();
        let labels: Vec<_> = all.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, ["first", "second"]);
    }

    #[tokio::test]
    async fn remove_unknown_is_not_found() {
        let repo: InMemoryRepository<Widget> = InMemoryRepository::new();
        let result = repo.remove(&EntityId::new("missing")).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn exists_reflects_removal() {
        let repo = InMemoryRepository::new();
        let id = EntityId::new("w1");
        repo.insert(Widget::new("w1", "first")).await.unwrap();
        assert!(repo.exists(&id).await.unwrap());

        repo.remove(&id).await.unwrap();
        assert!(!repo.exists(&id).await.unwrap());
    }

    #[tokio::test]
    async fn failing_writes_leave_store_untouched() {
        let repo = InMemoryRepository::new();
        repo.set_fail_writes(true);
        let result = repo.insert(Widget::new("w1", "first")).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(repo.is_empty().await);

        repo.set_fail_writes(false);
        repo.insert(Widget::new("w1", "first")).await.unwrap();
    }

    #[tokio::test]
    async fn unique_ids_are_distinct() {
        let repo: InMemoryRepository<Widget> = InMemoryRepository::new();
        let a = repo.unique_id().await.unwrap();
        let b = repo.unique_id().await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn aggregate_insert_and_remove_together() {
        let repo = InMemoryAggregateRepository::new();
        let record = AggregateRecord::new(Widget::new("o1", "order"), vec![part("l1"), part("l2")]);
        repo.insert(record.clone()).await.unwrap();

        assert_eq!(repo.find(&EntityId::new("o1")).await.unwrap(), record);
        assert_eq!(repo.child_count().await, 2);

        repo.remove(&EntityId::new("o1")).await.unwrap();
        assert!(repo.is_empty().await);
        assert_eq!(repo.child_count().await, 0);
    }

    #[tokio::test]
    async fn aggregate_duplicate_child_rejects_whole_insert() {
        let repo = InMemoryAggregateRepository::new();
        repo.insert(AggregateRecord::new(Widget::new("o1", "order"), vec![part("l1")]))
            .await
            .unwrap();

        let result = repo
            .insert(AggregateRecord::new(
                Widget::new("o2", "order"),
                vec![part("l2"), part("l1")],
            ))
            .await;

        assert!(matches!(result, Err(StoreError::DuplicateKey { entity: "Part", .. })));
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.child_count().await, 1);
    }

    #[tokio::test]
    async fn aggregate_update_root_keeps_children() {
        let repo = InMemoryAggregateRepository::new();
        repo.insert(AggregateRecord::new(Widget::new("o1", "order"), vec![part("l1")]))
            .await
            .unwrap();

        repo.update_root(Widget::new("o1", "amended")).await.unwrap();

        let stored = repo.find(&EntityId::new("o1")).await.unwrap();
        assert_eq!(stored.root.label, "amended");
        assert_eq!(stored.children, vec![part("l1")]);
    }

    #[tokio::test]
    async fn aggregate_failed_write_leaves_nothing() {
        let repo: InMemoryAggregateRepository<Widget, Part> = InMemoryAggregateRepository::new();
        repo.set_fail_writes(true);
        let result = repo
            .insert(AggregateRecord::new(Widget::new("o1", "order"), vec![part("l1")]))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(repo.is_empty().await);
        assert_eq!(repo.child_count().await, 0);
    }
}
