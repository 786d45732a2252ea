//! Query options shared by every repository lookup.

use crate::model::Record;
use serde::Serialize;

const DEFAULT_PER_PAGE: u32 = 20;

/// Column projection for read operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    /// Every column (`*`).
    #[default]
    All,
    /// Only the listed columns, in this order. An empty list means `All`.
    Only(Vec<String>),
}

impl Columns {
    pub fn only<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(columns.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Parses `asc`/`desc` case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Ordering for list operations.
///
/// `column = None` orders by the model's primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Option<String>,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: Direction::Desc,
        }
    }
}

/// Page selection for `find_all_paginated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Rows per page. `0` falls back to 20.
    pub per_page: u32,
    /// 1-based page number. `0` is treated as the first page.
    pub page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl Pagination {
    pub fn new(per_page: u32, page: u32) -> Self {
        Self { per_page, page }
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            per_page: if self.per_page == 0 {
                DEFAULT_PER_PAGE
            } else {
                self.per_page
            },
            page: self.page.max(1),
        }
    }

    /// Rows to skip; saturates at `i64::MAX` so huge pages read as empty.
    pub(crate) fn offset(self) -> i64 {
        i64::from(self.page.saturating_sub(1)).saturating_mul(i64::from(self.per_page))
    }
}

/// One page of records plus the totals needed to render page links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Record>,
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

impl Page {
    pub(crate) fn new(items: Vec<Record>, total: u64, pagination: Pagination) -> Self {
        let per_page = u64::from(pagination.per_page);
        let last_page = total.div_ceil(per_page).max(1);
        Self {
            items,
            total,
            per_page: pagination.per_page,
            current_page: pagination.page,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }
}
