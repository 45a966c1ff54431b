//! Error types for repository operations.

use memrepo_types::{EntityId, TypeError};
use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// A lookup that finds nothing and a delete of an absent id are not errors.
#[derive(Debug, Error)]
pub enum RepoError {
    /// More than one stored entity matches the id.
    #[error("ambiguous match for {id}: {count} entities share this id")]
    AmbiguousMatch { id: EntityId, count: usize },

    /// The lock guarding a shared repository was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Configuration could not be parsed or rendered.
    #[error("config error: {0}")]
    Config(String),

    /// Identifier could not be parsed.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// I/O error while reading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for repository operations.
pub type RepoResult<T> = std::result::Result<T, RepoError>;
