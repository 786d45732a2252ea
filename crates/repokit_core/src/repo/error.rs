use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors raised while binding or querying a repository.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// The resolved model has no backing table.
    ModelNotFound { model: String, table: String },
    /// No record matched `column = value`.
    EntityNotFound {
        model: String,
        column: String,
        value: String,
    },
    /// A runtime finder name does not follow a known convention.
    NoSuchMethod(String),
    /// A table or column name is not a plain SQL identifier.
    InvalidIdentifier(String),
    /// Column is not part of the bound table.
    UnknownColumn { table: String, column: String },
    /// Required column is missing from the bound table.
    MissingRequiredColumn { table: String, column: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ModelNotFound { model, table } => {
                write!(f, "model [{model}] does not exist (table `{table}`)")
            }
            Self::EntityNotFound {
                model,
                column,
                value,
            } => write!(f, "entity not found: {model} with {column} = {value}"),
            Self::NoSuchMethod(method) => write!(f, "method [{method}] does not exist"),
            Self::InvalidIdentifier(value) => {
                write!(f, "`{value}` is not a valid table or column name")
            }
            Self::UnknownColumn { table, column } => {
                write!(f, "table `{table}` has no column `{column}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "repository requires column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ModelNotFound { .. } => None,
            Self::EntityNotFound { .. } => None,
            Self::NoSuchMethod(_) => None,
            Self::InvalidIdentifier(_) => None,
            Self::UnknownColumn { .. } => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
