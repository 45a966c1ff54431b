//! Single-threaded, `Vec`-backed repository.
//!
//! [`MemoryRepository`] keeps entities in insertion order and finds them by
//! linear scan. Saving an id that is already present removes the old entity
//! and appends the new one, so a re-saved entity moves to the end.

use std::cmp::Ordering;

use memrepo_types::EntityId;
use tracing::{debug, trace, warn};

use crate::config::RepositoryConfig;
use crate::error::{RepoError, RepoResult};
use crate::traits::Storable;

/// An ordered in-memory collection of entities, unique by type-qualified id.
///
/// Data is lost when the repository is dropped. All insertion goes through
/// [`save`](Self::save) (or `Extend`/`FromIterator`, which do the same
/// remove-then-append), which keeps ids unique.
#[derive(Clone, Debug)]
pub struct MemoryRepository<T> {
    items: Vec<T>,
    config: RepositoryConfig,
}

impl<T> MemoryRepository<T> {
    /// Create a new empty repository with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RepositoryConfig::default())
    }

    /// Create a new empty repository with the given configuration.
    pub fn with_config(config: RepositoryConfig) -> Self {
        Self {
            items: Vec::with_capacity(config.initial_capacity),
            config,
        }
    }

    /// The configuration this repository was built with.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Every stored entity, in iteration order.
    ///
    /// The iterator borrows the repository; call again to restart.
    pub fn all(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Alias of [`all`](Self::all).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.all()
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Consume the repository, returning entities in iteration order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Storable> MemoryRepository<T> {
    /// Index of the entity matching `id`.
    ///
    /// Kinds are compared before values; an id of a kind nothing stored
    /// shares simply yields no match.
    fn position(&self, id: &EntityId) -> RepoResult<Option<usize>> {
        let mut found = None;
        let mut count = 0;

        for (index, item) in self.items.iter().enumerate() {
            let candidate = item.id();
            if candidate.kind() != id.kind() {
                continue;
            }
            if candidate.compare(id) != Some(Ordering::Equal) {
                continue;
            }
            if !self.config.detect_ambiguity {
                return Ok(Some(index));
            }
            count += 1;
            found.get_or_insert(index);
        }

        if count > 1 {
            warn!(%id, count, "ambiguous match: ids are no longer unique");
            return Err(RepoError::AmbiguousMatch {
                id: id.clone(),
                count,
            });
        }
        Ok(found)
    }

    fn take(&mut self, id: &EntityId) -> RepoResult<Option<T>> {
        Ok(self.position(id)?.map(|index| self.items.remove(index)))
    }

    /// The entity whose id matches `id`.
    ///
    /// Returns `Ok(None)` if nothing matches, and
    /// [`RepoError::AmbiguousMatch`] if ids were made non-unique by mutating
    /// an entity in place.
    pub fn find_by_id(&self, id: &EntityId) -> RepoResult<Option<&T>> {
        Ok(self.position(id)?.map(|index| &self.items[index]))
    }

    /// Mutable access to the entity whose id matches `id`.
    ///
    /// Changing the entity's id through this reference can break uniqueness;
    /// the next lookup of a duplicated id reports it.
    pub fn find_by_id_mut(&mut self, id: &EntityId) -> RepoResult<Option<&mut T>> {
        match self.position(id)? {
            Some(index) => Ok(Some(&mut self.items[index])),
            None => Ok(None),
        }
    }

    /// Returns `true` if an entity matches `id`.
    pub fn contains(&self, id: &EntityId) -> RepoResult<bool> {
        Ok(self.position(id)?.is_some())
    }

    /// Insert `item`, replacing any entity with a matching id.
    ///
    /// The replaced entity, if any, is returned. Either way `item` is
    /// appended at the end of iteration order.
    pub fn save(&mut self, item: T) -> RepoResult<Option<T>> {
        let replaced = self.take(item.id())?;
        if replaced.is_some() {
            debug!(id = %item.id(), "replaced entity");
        } else {
            debug!(id = %item.id(), "inserted entity");
        }
        self.items.push(item);
        Ok(replaced)
    }

    /// Remove and return the entity matching `id`.
    ///
    /// Deleting an id that is not present is a no-op.
    pub fn delete(&mut self, id: &EntityId) -> RepoResult<Option<T>> {
        let removed = self.take(id)?;
        if removed.is_some() {
            debug!(%id, "deleted entity");
        } else {
            trace!(%id, "delete of absent id ignored");
        }
        Ok(removed)
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Storable> Extend<T> for MemoryRepository<T> {
    /// Save each item in turn. Unlike [`save`](MemoryRepository::save) this
    /// cannot fail: every entity matching the incoming id is dropped before
    /// the item is appended.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            let before = self.items.len();
            self.items.retain(|existing| !existing.id().matches(item.id()));
            if self.items.len() + 1 < before {
                warn!(id = %item.id(), "dropped duplicate entities while extending");
            }
            self.items.push(item);
        }
    }
}

impl<T: Storable> FromIterator<T> for MemoryRepository<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut repo = Self::new();
        repo.extend(iter);
        repo
    }
}

impl<'a, T> IntoIterator for &'a MemoryRepository<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for MemoryRepository<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;

    /// Hand-written stand-in for an arbitrary entity.
    #[derive(Debug)]
    struct TestItem {
        id: EntityId,
        label: String,
    }

    impl Storable for TestItem {
        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    fn test_item(id: impl Into<EntityId>) -> Arc<TestItem> {
        Arc::new(TestItem {
            id: id.into(),
            label: String::new(),
        })
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    }

    /// Save one item per id, returning the repository and the saved items.
    fn create_and_populate(ids: Vec<EntityId>) -> (MemoryRepository<Arc<TestItem>>, Vec<Arc<TestItem>>) {
        init_tracing();
        let mut repo = MemoryRepository::new();
        let mut items = Vec::new();
        for id in ids {
            let item = test_item(id);
            repo.save(Arc::clone(&item)).unwrap();
            items.push(item);
        }
        (repo, items)
    }

    fn ids<const N: usize>(raw: [EntityId; N]) -> Vec<EntityId> {
        raw.into_iter().collect()
    }

    #[test]
    fn all_is_empty_for_a_fresh_repository() {
        let repo: MemoryRepository<Arc<TestItem>> = MemoryRepository::new();
        assert_eq!(repo.all().count(), 0);
        assert!(repo.is_empty());
    }

    #[test]
    fn save_with_a_new_item_adds_it() {
        let (repo, items) = create_and_populate(ids([1.into()]));

        let all: Vec<_> = repo.all().collect();
        assert_eq!(all.len(), 1);
        assert!(Arc::ptr_eq(all[0], &items[0]));
    }

    #[test]
    fn save_two_new_items_keeps_both_in_order() {
        let (repo, items) = create_and_populate(ids([1.into(), 2.into()]));

        let all: Vec<_> = repo.all().collect();
        assert!(Arc::ptr_eq(all[0], &items[0]));
        assert!(Arc::ptr_eq(all[1], &items[1]));
    }

    #[test]
    fn save_replaces_item_with_matching_id() {
        let (repo, items) = create_and_populate(ids(["ABC".into(), "ABC".into()]));

        let all: Vec<_> = repo.all().collect();
        assert_eq!(all.len(), 1);
        assert!(Arc::ptr_eq(all[0], &items[1]));
    }

    #[test]
    fn save_returns_the_replaced_item() {
        let mut repo = MemoryRepository::new();
        let first = test_item("ABC");
        assert!(repo.save(Arc::clone(&first)).unwrap().is_none());

        let replaced = repo.save(test_item("ABC")).unwrap().unwrap();
        assert!(Arc::ptr_eq(&replaced, &first));
    }

    #[test]
    fn resave_moves_item_to_the_end() {
        let (mut repo, _) = create_and_populate(ids([1.into(), 2.into(), 3.into()]));
        let again = test_item(1);
        repo.save(Arc::clone(&again)).unwrap();

        let order: Vec<_> = repo.all().map(|item| item.id().clone()).collect();
        assert_eq!(order, ids([2.into(), 3.into(), 1.into()]));
        assert!(Arc::ptr_eq(repo.all().last().unwrap(), &again));
    }

    #[test]
    fn save_with_different_id_kind_keeps_both() {
        let (repo, items) = create_and_populate(ids([1.into(), "ABC".into()]));

        let all: Vec<_> = repo.all().collect();
        assert_eq!(all.len(), 2);
        assert!(Arc::ptr_eq(all[0], &items[0]));
        assert!(Arc::ptr_eq(all[1], &items[1]));
    }

    #[test]
    fn int_and_string_of_same_digits_do_not_collide() {
        let (repo, _) = create_and_populate(ids([1.into(), "1".into()]));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn integer_ids_of_different_widths_do_not_collide() {
        let (repo, items) = create_and_populate(ids([1i32.into(), 1i64.into(), 1u8.into()]));
        assert_eq!(repo.len(), 3);

        let found = repo.find_by_id(&1i64.into()).unwrap().unwrap();
        assert!(Arc::ptr_eq(found, &items[1]));
        assert!(repo.find_by_id(&1i16.into()).unwrap().is_none());
    }

    #[test]
    fn find_by_id_returns_the_saved_item() {
        let (repo, items) = create_and_populate(ids([1.into(), 2.into()]));

        let found = repo.find_by_id(&1.into()).unwrap().unwrap();
        assert!(Arc::ptr_eq(found, &items[0]));
    }

    #[test]
    fn find_by_id_with_unknown_id_is_none() {
        let (repo, _) = create_and_populate(ids([1.into()]));
        assert!(repo.find_by_id(&2.into()).unwrap().is_none());
    }

    #[test]
    fn find_by_id_disambiguates_by_kind() {
        let (repo, items) = create_and_populate(ids([1.into(), "A".into()]));

        let found = repo.find_by_id(&"A".into()).unwrap().unwrap();
        assert!(Arc::ptr_eq(found, &items[1]));
        assert!(repo.find_by_id(&"1".into()).unwrap().is_none());
        assert!(repo.find_by_id(&1u64.into()).unwrap().is_none());
    }

    #[test]
    fn delete_removes_only_the_matching_item() {
        let (mut repo, items) = create_and_populate(ids([1.into(), 2.into(), 3.into()]));

        let removed = repo.delete(&1.into()).unwrap().unwrap();
        assert!(Arc::ptr_eq(&removed, &items[0]));

        assert!(repo.find_by_id(&1.into()).unwrap().is_none());
        let found = repo.find_by_id(&2.into()).unwrap().unwrap();
        assert!(Arc::ptr_eq(found, &items[1]));

        let order: Vec<_> = repo.all().map(|item| item.id().clone()).collect();
        assert_eq!(order, ids([2.into(), 3.into()]));
    }

    #[test]
    fn delete_of_absent_id_is_a_no_op() {
        init_tracing();
        let mut empty: MemoryRepository<Arc<TestItem>> = MemoryRepository::new();
        assert!(empty.delete(&"ABC".into()).unwrap().is_none());

        let (mut repo, _) = create_and_populate(ids([1.into()]));
        assert!(repo.delete(&"1".into()).unwrap().is_none());
        assert!(repo.delete(&2.into()).unwrap().is_none());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn delete_twice_is_idempotent() {
        let (mut repo, _) = create_and_populate(ids([1.into(), 2.into()]));

        repo.delete(&1.into()).unwrap();
        let after_once: Vec<_> = repo.all().map(|item| item.id().clone()).collect();
        repo.delete(&1.into()).unwrap();
        let after_twice: Vec<_> = repo.all().map(|item| item.id().clone()).collect();

        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn resave_changes_what_find_returns() {
        let mut repo = MemoryRepository::new();
        repo.save(TestItem {
            id: "k".into(),
            label: "old".into(),
        })
        .unwrap();
        repo.save(TestItem {
            id: "k".into(),
            label: "new".into(),
        })
        .unwrap();

        let found = repo.find_by_id(&"k".into()).unwrap().unwrap();
        assert_eq!(found.label, "new");
    }

    #[test]
    fn find_by_id_mut_edits_in_place() {
        let mut repo = MemoryRepository::new();
        repo.save(TestItem {
            id: 5.into(),
            label: "before".into(),
        })
        .unwrap();

        repo.find_by_id_mut(&5.into()).unwrap().unwrap().label = "after".into();

        assert_eq!(repo.find_by_id(&5.into()).unwrap().unwrap().label, "after");
    }

    #[test]
    fn mutated_id_collision_is_reported_as_ambiguous() {
        init_tracing();
        let mut repo = MemoryRepository::new();
        for n in [1, 2] {
            repo.save(TestItem {
                id: n.into(),
                label: n.to_string(),
            })
            .unwrap();
        }
        repo.find_by_id_mut(&2.into()).unwrap().unwrap().id = 1.into();

        let err = repo.find_by_id(&1.into()).unwrap_err();
        assert!(matches!(err, RepoError::AmbiguousMatch { count: 2, .. }));
        assert!(repo.delete(&1.into()).is_err());
        assert!(repo
            .save(TestItem {
                id: 1.into(),
                label: "x".into(),
            })
            .is_err());
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn lenient_config_returns_first_match() {
        let mut repo = MemoryRepository::with_config(RepositoryConfig::lenient());
        for label in ["first", "second"] {
            repo.save(TestItem {
                id: label.into(),
                label: label.into(),
            })
            .unwrap();
        }
        repo.find_by_id_mut(&"second".into()).unwrap().unwrap().id = "first".into();

        let found = repo.find_by_id(&"first".into()).unwrap().unwrap();
        assert_eq!(found.label, "first");
    }

    #[test]
    fn with_config_preallocates() {
        let config = RepositoryConfig {
            initial_capacity: 32,
            ..Default::default()
        };
        let repo: MemoryRepository<TestItem> = MemoryRepository::with_config(config.clone());
        assert!(repo.items.capacity() >= 32);
        assert_eq!(repo.config(), &config);
    }

    #[test]
    fn heterogeneous_entities_share_one_repository() {
        struct User {
            id: EntityId,
        }
        struct Order {
            id: EntityId,
        }
        impl Storable for User {
            fn id(&self) -> &EntityId {
                &self.id
            }
        }
        impl Storable for Order {
            fn id(&self) -> &EntityId {
                &self.id
            }
        }

        let user: Arc<dyn Storable> = Arc::new(User { id: "alice".into() });
        let order: Arc<dyn Storable> = Arc::new(Order {
            id: EntityId::new_uuid(),
        });
        let order_id = order.id().clone();

        let mut repo: MemoryRepository<Arc<dyn Storable>> = MemoryRepository::new();
        repo.save(Arc::clone(&user)).unwrap();
        repo.save(Arc::clone(&order)).unwrap();

        assert_eq!(repo.len(), 2);
        assert!(Arc::ptr_eq(repo.find_by_id(&order_id).unwrap().unwrap(), &order));
        assert!(Arc::ptr_eq(repo.find_by_id(&"alice".into()).unwrap().unwrap(), &user));
    }

    #[test]
    fn from_iter_applies_upsert() {
        let repo: MemoryRepository<Arc<TestItem>> =
            [test_item(1), test_item("a"), test_item(1)].into_iter().collect();

        let order: Vec<_> = repo.iter().map(|item| item.id().clone()).collect();
        assert_eq!(order, ids(["a".into(), 1.into()]));
    }

    #[test]
    fn into_iter_yields_entities_in_order() {
        let (repo, items) = create_and_populate(ids([3.into(), 1.into()]));

        let borrowed: Vec<_> = (&repo).into_iter().collect();
        assert!(Arc::ptr_eq(borrowed[0], &items[0]));

        let owned: Vec<_> = repo.into_iter().collect();
        assert!(Arc::ptr_eq(&owned[1], &items[1]));
    }

    #[test]
    fn clear_and_contains() {
        let (mut repo, _) = create_and_populate(ids([1.into()]));
        assert!(repo.contains(&1.into()).unwrap());
        repo.clear();
        assert!(!repo.contains(&1.into()).unwrap());
        assert!(repo.into_vec().is_empty());
    }

    #[test]
    fn parse_errors_convert_into_repo_errors() {
        fn lookup(repo: &MemoryRepository<Arc<TestItem>>, raw: &str) -> RepoResult<bool> {
            let id: EntityId = raw.parse()?;
            repo.contains(&id)
        }

        let (repo, _) = create_and_populate(ids(["1".into()]));
        assert!(lookup(&repo, "text:1").unwrap());
        assert!(!lookup(&repo, "i32:1").unwrap());
        assert!(matches!(lookup(&repo, "1"), Err(RepoError::Type(_))));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Save(EntityId),
        Delete(EntityId),
    }

    fn small_id() -> impl Strategy<Value = EntityId> {
        prop_oneof![
            (0i64..4).prop_map(EntityId::from),
            (0i64..4).prop_map(|n| EntityId::from(n.to_string())),
        ]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            small_id().prop_map(Op::Save),
            small_id().prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn ids_stay_unique_and_follow_remove_then_append(ops in proptest::collection::vec(op(), 0..40)) {
            let mut repo = MemoryRepository::new();
            let mut model: Vec<EntityId> = Vec::new();

            for op in ops {
                match op {
                    Op::Save(id) => {
                        repo.save(test_item(id.clone())).unwrap();
                        model.retain(|m| !m.matches(&id));
                        model.push(id);
                    }
                    Op::Delete(id) => {
                        repo.delete(&id).unwrap();
                        model.retain(|m| !m.matches(&id));
                    }
                }
            }

            let stored: Vec<EntityId> = repo.all().map(|item| item.id().clone()).collect();
            prop_assert_eq!(&stored, &model);
            for (i, a) in stored.iter().enumerate() {
                for b in &stored[i + 1..] {
                    prop_assert!(!a.matches(b));
                }
            }
        }
    }
}
