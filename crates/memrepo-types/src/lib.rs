//! Identifier types for memrepo.
//!
//! Entities in a memrepo repository are keyed by an [`EntityId`]: a tagged
//! identifier whose equality is type-qualified. Two ids match only when their
//! [`IdKind`]s are identical *and* their values compare equal, so `I32(1)`
//! never matches `I64(1)` or `Text("1")`.
//!
//! # Key Types
//!
//! - [`EntityId`] — Polymorphic, comparable entity identifier
//! - [`IdKind`] — The discriminant of an identifier
//! - [`TypeError`] — Parse failures for the textual id form

pub mod error;
pub mod id;

pub use error::TypeError;
pub use id::{EntityId, IdKind};
