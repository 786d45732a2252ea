//! Repository layer: generic CRUD over a convention-bound model.
//!
//! # Responsibility
//! - Define the `Repository` contract used by application code.
//! - Bind models to SQLite tables and keep SQL inside this boundary.
//! - Offer column finders both as generated helpers and as parsed names.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`ModelNotFound`,
//!   `EntityNotFound`, `NoSuchMethod`) in addition to DB transport errors.
//! - Operations hold no state besides the bound model.

mod error;
pub mod finder;
mod macros;
pub mod query;
pub mod repository;
pub mod sqlite_repo;

pub use error::{RepoError, RepoResult};
pub use finder::{FinderCall, FinderKind, FinderOutput};
pub use query::{Columns, Direction, OrderBy, Page, Pagination};
pub use repository::Repository;
pub use sqlite_repo::SqliteRepository;
