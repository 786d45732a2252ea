//! Convention-based model resolution.
//!
//! # Responsibility
//! - Derive the model bound to a repository from the repository's name.
//! - Honor explicit overrides for model name, folder, table and primary key.
//!
//! # Invariants
//! - Every literal `Repository` substring is stripped from the derived name.
//! - Table and primary key of a resolved `ModelRef` are valid identifiers.
//! - Resolution is pure; table existence is checked when a repository binds
//!   the model to a connection.

use crate::model::naming::{is_identifier, snake_case};
use crate::repo::{RepoError, RepoResult};
use std::fmt::{Display, Formatter};

const REPOSITORY_SUFFIX: &str = "Repository";
const DEFAULT_PRIMARY_KEY: &str = "id";

/// Declarative configuration a repository is built from.
///
/// Only `repository_name` is required; everything else falls back to the
/// naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Repository type name, optionally path-qualified (`app::UserRepository`).
    pub repository_name: String,
    /// Explicit model name; replaces the name derived from `repository_name`.
    pub model_name: Option<String>,
    /// Sub-namespace the model lives under. Prefixes the derived table.
    pub model_folder: Option<String>,
    /// Explicit table; replaces the derived table.
    pub table: Option<String>,
    /// Primary key column. Defaults to `id`.
    pub primary_key: String,
}

impl RepositoryConfig {
    pub fn for_repository(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            model_name: None,
            model_folder: None,
            table: None,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
        }
    }

    /// Configuration for a repository bound directly to `model_name`.
    pub fn for_model(model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        Self {
            repository_name: format!("{model_name}{REPOSITORY_SUFFIX}"),
            model_name: Some(model_name),
            ..Self::for_repository(String::new())
        }
    }

    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn model_folder(mut self, model_folder: impl Into<String>) -> Self {
        self.model_folder = Some(model_folder.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }
}

/// Resolved reference to the model a repository operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    folder: Option<String>,
    name: String,
    table: String,
    primary_key: String,
}

impl ModelRef {
    /// Resolves the model for `config` by naming convention.
    ///
    /// `UserRepository` resolves to model `User` on table `user`; with folder
    /// `Admin` it resolves to `Admin::User` on table `admin_user`.
    ///
    /// # Errors
    /// - `ModelNotFound` when nothing is left after stripping `Repository`.
    /// - `InvalidIdentifier` when a derived or configured name is not a plain
    ///   identifier.
    pub fn resolve(config: &RepositoryConfig) -> RepoResult<Self> {
        let name = match config.model_name.as_deref() {
            Some(explicit) => explicit.trim().to_string(),
            None => derive_model_name(&config.repository_name),
        };
        if name.is_empty() {
            return Err(RepoError::ModelNotFound {
                model: config.repository_name.clone(),
                table: String::new(),
            });
        }
        ensure_identifier(&name)?;

        let folder = config
            .model_folder
            .as_deref()
            .map(str::trim)
            .filter(|folder| !folder.is_empty())
            .map(str::to_string);
        if let Some(folder) = folder.as_deref() {
            ensure_identifier(folder)?;
        }

        let table = match config.table.as_deref() {
            Some(explicit) => explicit.trim().to_string(),
            None => match folder.as_deref() {
                Some(folder) => format!("{}_{}", snake_case(folder), snake_case(&name)),
                None => snake_case(&name),
            },
        };
        ensure_identifier(&table)?;

        let primary_key = config.primary_key.trim().to_string();
        ensure_identifier(&primary_key)?;

        Ok(Self {
            folder,
            name,
            table,
            primary_key,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Model name including its folder, e.g. `Admin::User`.
    pub fn qualified_name(&self) -> String {
        match self.folder.as_deref() {
            Some(folder) => format!("{folder}::{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl Display for ModelRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

fn derive_model_name(repository_name: &str) -> String {
    let last_segment = repository_name
        .rsplit("::")
        .next()
        .unwrap_or(repository_name);
    last_segment.replace(REPOSITORY_SUFFIX, "").trim().to_string()
}

fn ensure_identifier(value: &str) -> RepoResult<()> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(RepoError::InvalidIdentifier(value.to_string()))
    }
}
