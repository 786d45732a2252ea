//! Convention-driven generic repositories over SQLite.
//!
//! A repository named `XRepository` binds model `X` and exposes find,
//! create, update and delete operations plus column finders.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, Migration};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::{snake_case, Attributes, ModelRef, Record, RepositoryConfig};
pub use repo::{
    Columns, Direction, FinderCall, FinderKind, FinderOutput, OrderBy, Page, Pagination,
    RepoError, RepoResult, Repository, SqliteRepository,
};
pub use rusqlite::types::Value;

#[doc(hidden)]
pub use paste;
#[doc(hidden)]
pub use rusqlite;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
