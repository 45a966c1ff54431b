//! In-memory repository keyed by type-qualified entity ids.
//!
//! A repository holds entities exposing an [`EntityId`] and supports four
//! operations: enumerate, save (upsert), find by id, and delete. Ids of
//! different kinds may live side by side in one repository; `I32(1)`,
//! `I64(1)` and `Text("1")` are three distinct keys.
//!
//! # Modules
//!
//! - [`error`] — Error types for repository operations
//! - [`traits`] — The [`Storable`] capability and the [`Repository`] trait
//! - [`memory`] — Single-threaded, `Vec`-backed [`MemoryRepository`]
//! - [`shared`] — Lock-guarded [`SharedRepository`] for concurrent callers
//! - [`config`] — [`RepositoryConfig`] loaded from TOML

pub mod config;
pub mod error;
pub mod memory;
pub mod shared;
pub mod traits;

pub use config::RepositoryConfig;
pub use error::{RepoError, RepoResult};
pub use memory::MemoryRepository;
pub use shared::SharedRepository;
pub use traits::{Repository, Storable};

pub use memrepo_types::{EntityId, IdKind, TypeError};
