//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the plate store and list store contracts.
//! - Isolate SQLite query details from membership orchestration.
//!
//! # Invariants
//! - Uniqueness (canonical key, list name, membership pair) is enforced by
//!   storage constraints, never by in-process locks.
//! - Repository APIs return semantic errors in addition to DB transport
//!   errors; "no row" lookups return `Option`, not errors.

mod error;
pub mod list_repo;
pub mod plate_repo;

pub use error::{RepoError, RepoResult};
