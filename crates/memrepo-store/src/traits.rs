//! The [`Storable`] entity capability and the [`Repository`] storage trait.

use std::rc::Rc;
use std::sync::Arc;

use memrepo_types::EntityId;

use crate::error::RepoResult;

/// Capability required of anything kept in a repository: an identifier.
///
/// Smart pointers forward to their pointee, so `Arc<dyn Storable>` lets one
/// repository hold entities of unrelated concrete types.
pub trait Storable {
    /// The identifier of this entity.
    fn id(&self) -> &EntityId;
}

impl<T: Storable + ?Sized> Storable for &T {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

impl<T: Storable + ?Sized> Storable for Box<T> {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

impl<T: Storable + ?Sized> Storable for Rc<T> {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

impl<T: Storable + ?Sized> Storable for Arc<T> {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

/// Thread-safe repository interface.
///
/// Methods take `&self` and return owned values so implementations can guard
/// their state with a lock. Entities are cloned out; for reference semantics
/// store `Arc<T>`.
pub trait Repository<T: Storable>: Send + Sync {
    /// Every stored entity, in iteration order.
    fn all(&self) -> RepoResult<Vec<T>>;

    /// The entity whose id matches `id`.
    ///
    /// Returns `Ok(None)` if nothing matches.
    fn find_by_id(&self, id: &EntityId) -> RepoResult<Option<T>>;

    /// Insert `item`, replacing any entity with a matching id.
    fn save(&self, item: T) -> RepoResult<()>;

    /// Remove the entity matching `id`. Absent ids are a no-op.
    fn delete(&self, id: &EntityId) -> RepoResult<()>;

    /// Returns `true` if an entity matches `id`.
    fn contains(&self, id: &EntityId) -> RepoResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Number of stored entities.
    fn count(&self) -> RepoResult<usize> {
        Ok(self.all()?.len())
    }
}
