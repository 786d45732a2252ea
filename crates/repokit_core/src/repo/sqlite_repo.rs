//! SQLite implementation of the generic repository contract.
//!
//! # Responsibility
//! - Bind a resolved `ModelRef` to an existing table on a live connection.
//! - Translate repository operations to parameterized SQL.
//!
//! # Invariants
//! - Construction fails with `ModelNotFound` when the model table is absent.
//! - Names are validated against the bound table before interpolation;
//!   values are always bound parameters.
//! - A `NULL` filter value is matched with `IS NULL`.
//! - `update` and `delete` check existence before writing.
//! - `created_at`/`updated_at` are filled with epoch milliseconds when the
//!   table has them and the caller did not supply them.

use crate::db::schema::{table_columns, table_exists};
use crate::model::naming::is_identifier;
use crate::model::record::display_value;
use crate::model::{Attributes, ModelRef, Record, RepositoryConfig};
use crate::repo::query::{Columns, OrderBy, Page, Pagination};
use crate::repo::repository::{not_found, Repository};
use crate::repo::{RepoError, RepoResult};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

const CREATED_AT_COLUMN: &str = "created_at";
const UPDATED_AT_COLUMN: &str = "updated_at";
const NOW_EPOCH_MS_SQL: &str = "(strftime('%s', 'now') * 1000)";

/// Repository bound to one table on a borrowed SQLite connection.
pub struct SqliteRepository<'conn> {
    conn: &'conn Connection,
    model: ModelRef,
    table_columns: Vec<String>,
}

impl<'conn> SqliteRepository<'conn> {
    /// Resolves the model for `config` and binds it to `conn`.
    ///
    /// # Errors
    /// - `ModelNotFound` when the derived table does not exist.
    /// - `MissingRequiredColumn` when the primary key column is absent.
    /// - `InvalidIdentifier` when a derived name is not a plain identifier.
    pub fn try_new(conn: &'conn Connection, config: RepositoryConfig) -> RepoResult<Self> {
        let model = ModelRef::resolve(&config)?;
        let table_columns = bind_model(conn, &model)?;
        debug!(
            "event=repo_bind module=repo status=ok repository={} model={} table={}",
            config.repository_name,
            model,
            model.table()
        );
        Ok(Self {
            conn,
            model,
            table_columns,
        })
    }

    /// Rebinds this repository to another model.
    ///
    /// The current binding is kept when the new model cannot be bound.
    pub fn set_model(&mut self, model: ModelRef) -> RepoResult<()> {
        let table_columns = bind_model(self.conn, &model)?;
        debug!(
            "event=repo_rebind module=repo status=ok from={} to={} table={}",
            self.model,
            model,
            model.table()
        );
        self.model = model;
        self.table_columns = table_columns;
        Ok(())
    }

    /// Columns of the bound table, in declaration order.
    pub fn table_columns(&self) -> &[String] {
        &self.table_columns
    }

    fn ensure_column(&self, column: &str) -> RepoResult<()> {
        if !is_identifier(column) {
            return Err(RepoError::InvalidIdentifier(column.to_string()));
        }
        if !self.table_columns.iter().any(|known| known == column) {
            return Err(RepoError::UnknownColumn {
                table: self.model.table().to_string(),
                column: column.to_string(),
            });
        }
        Ok(())
    }

    fn has_column(&self, column: &str) -> bool {
        self.table_columns.iter().any(|known| known == column)
    }

    fn select_list(&self, columns: &Columns) -> RepoResult<String> {
        match columns {
            Columns::Only(list) if !list.is_empty() => {
                for column in list {
                    self.ensure_column(column)?;
                }
                Ok(list
                    .iter()
                    .map(|column| quote(column))
                    .collect::<Vec<_>>()
                    .join(", "))
            }
            _ => Ok("*".to_string()),
        }
    }

    fn order_clause(&self, order_by: &OrderBy) -> RepoResult<String> {
        let primary_key = self.model.primary_key();
        let column = order_by.column.as_deref().unwrap_or(primary_key);
        self.ensure_column(column)?;

        let mut clause = format!(
            " ORDER BY {} {}",
            quote(column),
            order_by.direction.as_sql()
        );
        if column != primary_key {
            clause.push_str(&format!(", {} ASC", quote(primary_key)));
        }
        Ok(clause)
    }

    /// Builds `"column" = ?1`, or `"column" IS NULL` with nothing to bind.
    fn filter_clause(&self, column: &str, value: Value) -> RepoResult<(String, Vec<Value>)> {
        self.ensure_column(column)?;
        Ok(match value {
            Value::Null => (format!("{} IS NULL", quote(column)), Vec::new()),
            value => (format!("{} = ?1", quote(column)), vec![value]),
        })
    }

    fn query_records(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(Record::from_row(row, &names)?);
        }
        Ok(records)
    }

    fn query_first(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Option<Record>> {
        Ok(self.query_records(sql, bind_values)?.into_iter().next())
    }

    fn ensure_writable(&self, data: &Attributes) -> RepoResult<()> {
        for (column, _) in data.iter() {
            self.ensure_column(column)?;
        }
        Ok(())
    }

    fn timestamp_defaults(&self, data: &Attributes, columns: &[&'static str]) -> Vec<&'static str> {
        columns
            .iter()
            .copied()
            .filter(|column| self.has_column(column) && !data.contains(column))
            .collect()
    }
}

impl Repository for SqliteRepository<'_> {
    fn model(&self) -> &ModelRef {
        &self.model
    }

    fn find(&self, id: impl Into<Value>, columns: &Columns) -> RepoResult<Option<Record>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 LIMIT 1;",
            self.select_list(columns)?,
            quote(self.model.table()),
            quote(self.model.primary_key())
        );
        self.query_first(&sql, vec![id.into()])
    }

    fn find_by(
        &self,
        column: &str,
        value: impl Into<Value>,
        columns: &Columns,
    ) -> RepoResult<Option<Record>> {
        let (filter, bind_values) = self.filter_clause(column, value.into())?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {} ASC LIMIT 1;",
            self.select_list(columns)?,
            quote(self.model.table()),
            filter,
            quote(self.model.primary_key())
        );
        self.query_first(&sql, bind_values)
    }

    fn find_all(&self, order_by: &OrderBy, columns: &Columns) -> RepoResult<Vec<Record>> {
        let sql = format!(
            "SELECT {} FROM {}{};",
            self.select_list(columns)?,
            quote(self.model.table()),
            self.order_clause(order_by)?
        );
        self.query_records(&sql, Vec::new())
    }

    fn find_all_by(
        &self,
        column: &str,
        value: impl Into<Value>,
        order_by: &OrderBy,
        columns: &Columns,
    ) -> RepoResult<Vec<Record>> {
        let (filter, bind_values) = self.filter_clause(column, value.into())?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {}{};",
            self.select_list(columns)?,
            quote(self.model.table()),
            filter,
            self.order_clause(order_by)?
        );
        self.query_records(&sql, bind_values)
    }

    fn find_all_paginated(
        &self,
        pagination: Pagination,
        order_by: &OrderBy,
        columns: &Columns,
    ) -> RepoResult<Page> {
        let pagination = pagination.normalized();
        let select_list = self.select_list(columns)?;
        let order_clause = self.order_clause(order_by)?;

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", quote(self.model.table())),
            [],
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {} FROM {}{} LIMIT ?1 OFFSET ?2;",
            select_list,
            quote(self.model.table()),
            order_clause
        );
        let items = self.query_records(
            &sql,
            vec![
                Value::Integer(i64::from(pagination.per_page)),
                Value::Integer(pagination.offset()),
            ],
        )?;

        Ok(Page::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            pagination,
        ))
    }

    fn create(&self, data: &Attributes) -> RepoResult<Record> {
        self.ensure_writable(data)?;

        let mut names = Vec::new();
        let mut placeholders = Vec::new();
        let mut bind_values = Vec::new();
        for (column, value) in data.iter() {
            bind_values.push(value.clone());
            names.push(quote(column));
            placeholders.push(format!("?{}", bind_values.len()));
        }
        for column in self.timestamp_defaults(data, &[CREATED_AT_COLUMN, UPDATED_AT_COLUMN]) {
            names.push(quote(column));
            placeholders.push(NOW_EPOCH_MS_SQL.to_string());
        }

        let table = quote(self.model.table());
        let sql = if names.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES;")
        } else {
            format!(
                "INSERT INTO {table} ({}) VALUES ({});",
                names.join(", "),
                placeholders.join(", ")
            )
        };
        self.conn.execute(&sql, params_from_iter(bind_values))?;

        let rowid = self.conn.last_insert_rowid();
        let created = self
            .query_first(
                &format!("SELECT * FROM {table} WHERE rowid = ?1;"),
                vec![Value::Integer(rowid)],
            )?
            .ok_or_else(|| not_found(&self.model, "rowid", &Value::Integer(rowid)))?;

        info!(
            "event=repo_create module=repo status=ok model={} rowid={}",
            self.model, rowid
        );
        Ok(created)
    }

    fn update(&self, id: impl Into<Value>, data: &Attributes) -> RepoResult<Record> {
        let id = id.into();
        let current = self.find_or_fail(id.clone(), &Columns::All).inspect_err(|err| {
            warn!(
                "event=repo_update module=repo status=error model={} id={} error={}",
                self.model,
                display_value(&id),
                err
            );
        })?;
        self.ensure_writable(data)?;
        if data.is_empty() {
            return Ok(current);
        }

        let mut assignments = Vec::new();
        let mut bind_values = Vec::new();
        for (column, value) in data.iter() {
            bind_values.push(value.clone());
            assignments.push(format!("{} = ?{}", quote(column), bind_values.len()));
        }
        for column in self.timestamp_defaults(data, &[UPDATED_AT_COLUMN]) {
            assignments.push(format!("{} = {NOW_EPOCH_MS_SQL}", quote(column)));
        }
        bind_values.push(id.clone());

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{};",
            quote(self.model.table()),
            assignments.join(", "),
            quote(self.model.primary_key()),
            bind_values.len()
        );
        self.conn.execute(&sql, params_from_iter(bind_values))?;

        info!(
            "event=repo_update module=repo status=ok model={} id={} fields={}",
            self.model,
            display_value(&id),
            data.len()
        );

        // Key changes are re-read by the new key as given; column affinity
        // coerces it the same way the UPDATE stored it.
        let refreshed_id = data
            .get(self.model.primary_key())
            .cloned()
            .unwrap_or(id);
        self.find_or_fail(refreshed_id, &Columns::All)
    }

    fn delete(&self, id: impl Into<Value>) -> RepoResult<()> {
        let id = id.into();
        self.find_or_fail(id.clone(), &Columns::only([self.model.primary_key()]))
            .inspect_err(|err| {
                warn!(
                    "event=repo_delete module=repo status=error model={} id={} error={}",
                    self.model,
                    display_value(&id),
                    err
                );
            })?;

        self.conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?1;",
                quote(self.model.table()),
                quote(self.model.primary_key())
            ),
            [&id],
        )?;

        info!(
            "event=repo_delete module=repo status=ok model={} id={}",
            self.model,
            display_value(&id)
        );
        Ok(())
    }
}

fn bind_model(conn: &Connection, model: &ModelRef) -> RepoResult<Vec<String>> {
    if !table_exists(conn, model.table())? {
        warn!(
            "event=repo_bind module=repo status=error model={} table={} error_code=model_not_found",
            model,
            model.table()
        );
        return Err(RepoError::ModelNotFound {
            model: model.qualified_name(),
            table: model.table().to_string(),
        });
    }

    let columns = table_columns(conn, model.table())?;
    if !columns.iter().any(|column| column == model.primary_key()) {
        return Err(RepoError::MissingRequiredColumn {
            table: model.table().to_string(),
            column: model.primary_key().to_string(),
        });
    }
    Ok(columns)
}

fn quote(identifier: &str) -> String {
    format!("\"{identifier}\"")
}
