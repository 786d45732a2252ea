//! Finder names given as text (CLI input, routing tables).
//!
//! Code that knows its columns at build time should use the helpers that
//! `define_repository!` generates; this module covers names that only exist
//! at run time.

use crate::model::naming::{is_identifier, snake_case};
use crate::model::Record;
use crate::repo::query::{Columns, OrderBy};
use crate::repo::repository::Repository;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderKind {
    /// `find_by`: first match or nothing.
    FindBy,
    /// `find_or_fail_by`: first match or `EntityNotFound`.
    FindOrFailBy,
    /// `find_all_by`: every match.
    FindAllBy,
}

// Checked in order; the first matching prefix decides the kind.
const PREFIXES: &[(&str, FinderKind)] = &[
    ("findBy", FinderKind::FindBy),
    ("findOrFailBy", FinderKind::FindOrFailBy),
    ("findAllBy", FinderKind::FindAllBy),
    ("find_by_", FinderKind::FindBy),
    ("find_or_fail_by_", FinderKind::FindOrFailBy),
    ("find_all_by_", FinderKind::FindAllBy),
];

/// Parsed finder call: which lookup to run on which column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderCall {
    kind: FinderKind,
    column: String,
}

/// Result of a dispatched finder call.
#[derive(Debug, Clone, PartialEq)]
pub enum FinderOutput {
    One(Option<Record>),
    Many(Vec<Record>),
}

impl FinderCall {
    pub fn new(kind: FinderKind, column: impl Into<String>) -> Self {
        Self {
            kind,
            column: column.into(),
        }
    }

    /// Parses `findByEmail`, `findAllByCreatedAt`, `find_or_fail_by_status`...
    ///
    /// The part after the prefix is converted to snake case and used as the
    /// filter column.
    ///
    /// # Errors
    /// - `NoSuchMethod` when no prefix matches or the column part is empty or
    ///   not an identifier.
    pub fn parse(method: &str) -> RepoResult<Self> {
        let method = method.trim();
        for (prefix, kind) in PREFIXES {
            let Some(rest) = method.strip_prefix(prefix) else {
                continue;
            };
            let column = snake_case(rest);
            if column.is_empty() || !is_identifier(&column) {
                break;
            }
            return Ok(Self::new(*kind, column));
        }
        Err(RepoError::NoSuchMethod(method.to_string()))
    }

    pub fn kind(&self) -> FinderKind {
        self.kind
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Runs this finder against `repo`.
    ///
    /// `order_by` is only used by `FindAllBy`.
    pub fn dispatch<R: Repository>(
        &self,
        repo: &R,
        value: impl Into<Value>,
        order_by: &OrderBy,
        columns: &Columns,
    ) -> RepoResult<FinderOutput> {
        match self.kind {
            FinderKind::FindBy => repo
                .find_by(&self.column, value, columns)
                .map(FinderOutput::One),
            FinderKind::FindOrFailBy => repo
                .find_or_fail_by(&self.column, value, columns)
                .map(|record| FinderOutput::One(Some(record))),
            FinderKind::FindAllBy => repo
                .find_all_by(&self.column, value, order_by, columns)
                .map(FinderOutput::Many),
        }
    }
}
