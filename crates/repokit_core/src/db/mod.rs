//! SQLite connection bootstrap, migration and schema introspection.
//!
//! # Responsibility
//! - Open and configure SQLite connections for repository use.
//! - Apply application-supplied schema migrations in deterministic order.
//! - Answer schema questions (table existence, column list) for model
//!   resolution.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - An empty migration list means the schema is managed outside this crate.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod schema;

pub use migrations::Migration;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating a store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a statement or could not open the file.
    Sqlite(rusqlite::Error),
    /// The store was migrated past the last version the caller knows.
    SchemaAhead { found: u32, known: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::SchemaAhead { found, known } => write!(
                f,
                "store is at schema version {found} but migrations only reach {known}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}
