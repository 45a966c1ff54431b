//! Lock-guarded repository for concurrent callers.
//!
//! [`SharedRepository`] wraps a [`MemoryRepository`] in a `RwLock` held for
//! the whole of each operation, and implements the [`Repository`] trait.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use memrepo_types::EntityId;

use crate::config::RepositoryConfig;
use crate::error::{RepoError, RepoResult};
use crate::memory::MemoryRepository;
use crate::traits::{Repository, Storable};

/// A [`MemoryRepository`] behind a `RwLock`.
///
/// Entities are cloned out of the lock; store `Arc<T>` to share them.
#[derive(Debug)]
pub struct SharedRepository<T> {
    inner: RwLock<MemoryRepository<T>>,
}

impl<T> SharedRepository<T> {
    /// Create a new empty shared repository.
    pub fn new() -> Self {
        Self::from_repository(MemoryRepository::new())
    }

    /// Create a new empty shared repository with the given configuration.
    pub fn with_config(config: RepositoryConfig) -> Self {
        Self::from_repository(MemoryRepository::with_config(config))
    }

    /// Wrap an existing repository.
    pub fn from_repository(repo: MemoryRepository<T>) -> Self {
        Self {
            inner: RwLock::new(repo),
        }
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, MemoryRepository<T>>> {
        self.inner
            .read()
            .map_err(|e| RepoError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, MemoryRepository<T>>> {
        self.inner
            .write()
            .map_err(|e| RepoError::LockPoisoned(e.to_string()))
    }

    /// Number of stored entities.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Unwrap the inner repository.
    pub fn into_inner(self) -> RepoResult<MemoryRepository<T>> {
        self.inner
            .into_inner()
            .map_err(|e| RepoError::LockPoisoned(e.to_string()))
    }
}

impl<T: Clone> SharedRepository<T> {
    /// A point-in-time copy of every stored entity.
    pub fn snapshot(&self) -> RepoResult<Vec<T>> {
        Ok(self.read()?.all().cloned().collect())
    }
}

impl<T> Default for SharedRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<MemoryRepository<T>> for SharedRepository<T> {
    fn from(repo: MemoryRepository<T>) -> Self {
        Self::from_repository(repo)
    }
}

impl<T> Repository<T> for SharedRepository<T>
where
    T: Storable + Clone + Send + Sync,
{
    fn all(&self) -> RepoResult<Vec<T>> {
        self.snapshot()
    }

    fn find_by_id(&self, id: &EntityId) -> RepoResult<Option<T>> {
        Ok(self.read()?.find_by_id(id)?.cloned())
    }

    fn save(&self, item: T) -> RepoResult<()> {
        self.write()?.save(item)?;
        Ok(())
    }

    fn delete(&self, id: &EntityId) -> RepoResult<()> {
        self.write()?.delete(id)?;
        Ok(())
    }

    fn count(&self) -> RepoResult<usize> {
        self.len()
    }
}
