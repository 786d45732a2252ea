//! Repository contract shared by every model-bound repository.

use crate::model::record::display_value;
use crate::model::{Attributes, ModelRef, Record};
use crate::repo::query::{Columns, OrderBy, Pagination, Page};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;

/// Generic CRUD and lookup operations over one model.
pub trait Repository {
    /// Model this repository is bound to.
    fn model(&self) -> &ModelRef;

    /// Finds one record by primary key.
    ///
    /// Keys of any SQLite type are accepted, so TEXT keys work as well as
    /// integer ones.
    fn find(&self, id: impl Into<Value>, columns: &Columns) -> RepoResult<Option<Record>>;

    /// Finds one record by primary key or fails with `EntityNotFound`.
    fn find_or_fail(&self, id: impl Into<Value>, columns: &Columns) -> RepoResult<Record> {
        let id = id.into();
        self.find(id.clone(), columns)?
            .ok_or_else(|| not_found(self.model(), self.model().primary_key(), &id))
    }

    /// Finds the first record (by primary key) where `column = value`.
    ///
    /// A `Value::Null` matches rows where `column IS NULL`.
    fn find_by(
        &self,
        column: &str,
        value: impl Into<Value>,
        columns: &Columns,
    ) -> RepoResult<Option<Record>>;

    /// Like `find_by`, failing with `EntityNotFound` when nothing matches.
    fn find_or_fail_by(
        &self,
        column: &str,
        value: impl Into<Value>,
        columns: &Columns,
    ) -> RepoResult<Record> {
        let value = value.into();
        self.find_by(column, value.clone(), columns)?
            .ok_or_else(|| not_found(self.model(), column, &value))
    }

    /// Returns every record in `order_by` order.
    fn find_all(&self, order_by: &OrderBy, columns: &Columns) -> RepoResult<Vec<Record>>;

    /// Returns every record where `column = value`, in `order_by` order.
    fn find_all_by(
        &self,
        column: &str,
        value: impl Into<Value>,
        order_by: &OrderBy,
        columns: &Columns,
    ) -> RepoResult<Vec<Record>>;

    /// Returns one page of records in `order_by` order.
    fn find_all_paginated(
        &self,
        pagination: Pagination,
        order_by: &OrderBy,
        columns: &Columns,
    ) -> RepoResult<Page>;

    /// Persists a new record and returns it as stored.
    fn create(&self, data: &Attributes) -> RepoResult<Record>;

    /// Applies `data` to an existing record and returns the refreshed record.
    ///
    /// Fails with `EntityNotFound` before writing when `id` does not exist.
    fn update(&self, id: impl Into<Value>, data: &Attributes) -> RepoResult<Record>;

    /// Removes an existing record.
    ///
    /// Fails with `EntityNotFound` without deleting when `id` does not exist.
    fn delete(&self, id: impl Into<Value>) -> RepoResult<()>;
}

pub(crate) fn not_found(model: &ModelRef, column: &str, value: &Value) -> RepoError {
    RepoError::EntityNotFound {
        model: model.qualified_name(),
        column: column.to_string(),
        value: display_value(value),
    }
}
