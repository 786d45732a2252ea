//! Repository commands
//!
//! Every command opens the database with its existing schema, binds the
//! named repository and prints the result as JSON.

use crate::GlobalArgs;
use clap::Args;
use repokit_core::{
    open_db, Attributes, Columns, Direction, FinderCall, FinderOutput, OrderBy, Pagination,
    Repository, RepositoryConfig, SqliteRepository, Value,
};
use serde_json::json;
use std::error::Error;

pub type CommandResult = Result<String, Box<dyn Error>>;

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Repository name, e.g. UserRepository
    pub repository: String,
    /// Primary key value, typed like FIELD=VALUE values
    #[arg(allow_negative_numbers = true)]
    pub id: String,
    /// Comma-separated columns to return
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
    /// Fail when the record does not exist
    #[arg(long)]
    pub or_fail: bool,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    pub repository: String,
    /// Finder name: findBy*, findOrFailBy*, findAllBy* (or snake_case)
    pub method: String,
    /// Value to match; see FIELD=VALUE rules for typing
    pub value: String,
    /// Ordering for findAllBy*, as COLUMN[:asc|desc]
    #[arg(long)]
    pub order_by: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AllArgs {
    pub repository: String,
    /// Ordering as COLUMN[:asc|desc]; primary key ascending by default
    #[arg(long)]
    pub order_by: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
    /// Page size; enables pagination
    #[arg(long)]
    pub per_page: Option<u32>,
    /// 1-based page number (default 1)
    #[arg(long, requires = "per_page")]
    pub page: Option<u32>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub repository: String,
    /// FIELD=VALUE pairs (`null`, integers and decimals are typed, the rest is text)
    #[arg(required = true)]
    pub fields: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub repository: String,
    #[arg(allow_negative_numbers = true)]
    pub id: String,
    #[arg(required = true)]
    pub fields: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub repository: String,
    #[arg(allow_negative_numbers = true)]
    pub id: String,
}

/// Execute find
pub fn execute_find(global: &GlobalArgs, args: FindArgs) -> CommandResult {
    with_repository(global, &args.repository, |repo| {
        let columns = columns_arg(args.columns);
        let id = parse_value(&args.id);
        if args.or_fail {
            let record = repo.find_or_fail(id, &columns)?;
            Ok(serde_json::to_string_pretty(&record)?)
        } else {
            let record = repo.find(id, &columns)?;
            Ok(serde_json::to_string_pretty(&record)?)
        }
    })
}

/// Execute a finder given by name
pub fn execute_call(global: &GlobalArgs, args: CallArgs) -> CommandResult {
    let call = FinderCall::parse(&args.method)?;
    let order_by = order_by_arg(args.order_by.as_deref())?;
    with_repository(global, &args.repository, |repo| {
        let output = call.dispatch(
            repo,
            parse_value(&args.value),
            &order_by,
            &columns_arg(args.columns),
        )?;
        match output {
            FinderOutput::One(record) => Ok(serde_json::to_string_pretty(&record)?),
            FinderOutput::Many(records) => Ok(serde_json::to_string_pretty(&records)?),
        }
    })
}

/// Execute list, paginated when --per-page is given
pub fn execute_all(global: &GlobalArgs, args: AllArgs) -> CommandResult {
    let order_by = order_by_arg(args.order_by.as_deref())?;
    with_repository(global, &args.repository, |repo| {
        let columns = columns_arg(args.columns);
        match args.per_page {
            Some(per_page) => {
                let page = repo.find_all_paginated(
                    Pagination::new(per_page, args.page.unwrap_or(1)),
                    &order_by,
                    &columns,
                )?;
                Ok(serde_json::to_string_pretty(&page)?)
            }
            None => {
                let records = repo.find_all(&order_by, &columns)?;
                Ok(serde_json::to_string_pretty(&records)?)
            }
        }
    })
}

/// Execute create
pub fn execute_create(global: &GlobalArgs, args: CreateArgs) -> CommandResult {
    let data = fields_arg(&args.fields)?;
    with_repository(global, &args.repository, |repo| {
        let record = repo.create(&data)?;
        Ok(serde_json::to_string_pretty(&record)?)
    })
}

/// Execute update
pub fn execute_update(global: &GlobalArgs, args: UpdateArgs) -> CommandResult {
    let data = fields_arg(&args.fields)?;
    with_repository(global, &args.repository, |repo| {
        let record = repo.update(parse_value(&args.id), &data)?;
        Ok(serde_json::to_string_pretty(&record)?)
    })
}

/// Execute delete
pub fn execute_delete(global: &GlobalArgs, args: DeleteArgs) -> CommandResult {
    with_repository(global, &args.repository, |repo| {
        let id = parse_value(&args.id);
        repo.delete(id.clone())?;
        Ok(serde_json::to_string_pretty(&json!({
            "model": repo.model().qualified_name(),
            "deleted": json_value(id),
        }))?)
    })
}

fn with_repository<F>(global: &GlobalArgs, repository: &str, run: F) -> CommandResult
where
    F: FnOnce(&SqliteRepository<'_>) -> CommandResult,
{
    if !global.db.exists() {
        return Err(format!("database `{}` does not exist", global.db.display()).into());
    }

    let conn = open_db(&global.db, &[])?;
    let repo = SqliteRepository::try_new(&conn, repository_config(global, repository))?;
    run(&repo)
}

fn repository_config(global: &GlobalArgs, repository: &str) -> RepositoryConfig {
    let mut config =
        RepositoryConfig::for_repository(repository).primary_key(global.primary_key.as_str());
    if let Some(folder) = global.folder.as_deref() {
        config = config.model_folder(folder);
    }
    if let Some(table) = global.table.as_deref() {
        config = config.table(table);
    }
    config
}

fn columns_arg(columns: Vec<String>) -> Columns {
    if columns.is_empty() {
        Columns::All
    } else {
        Columns::Only(columns)
    }
}

/// Parses `COLUMN[:asc|desc]`.
fn order_by_arg(raw: Option<&str>) -> Result<OrderBy, Box<dyn Error>> {
    let Some(raw) = raw else {
        return Ok(OrderBy::default());
    };
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => {
            let direction = Direction::parse(direction)
                .ok_or_else(|| format!("invalid order direction `{direction}`; expected asc|desc"))?;
            (column, direction)
        }
        None => (raw, Direction::Asc),
    };
    Ok(OrderBy {
        column: Some(column.trim().to_string()),
        direction,
    })
}

fn fields_arg(fields: &[String]) -> Result<Attributes, Box<dyn Error>> {
    let mut data = Attributes::new();
    for field in fields {
        let (column, raw) = field
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got `{field}`"))?;
        data.insert(column.trim(), parse_value(raw));
    }
    Ok(data)
}

/// Types a command-line value: `null`, integer, decimal, otherwise text.
fn parse_value(raw: &str) -> Value {
    if raw == "null" {
        return Value::Null;
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::Integer(integer);
    }
    if raw.contains('.') {
        if let Ok(real) = raw.parse::<f64>() {
            return Value::Real(real);
        }
    }
    Value::Text(raw.to_string())
}

fn json_value(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(integer) => integer.into(),
        Value::Real(real) => real.into(),
        Value::Text(text) => text.into(),
        Value::Blob(bytes) => bytes.into(),
    }
}
