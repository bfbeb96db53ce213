//! Persistence gateway
//!
//! Row-based access to the four entity tables. A row is a JSON object keyed by
//! column name; services convert rows to and from the typed models with
//! [`to_row`] and [`from_row`].
//!
//! Two backends implement [`Store`]:
//! - [`SqliteStore`]: embedded SQLite through sqlx
//! - [`RestStore`]: hosted PostgREST-compatible store over HTTPS

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::db::table_schemas::{expected_columns, ColumnDefinition};
use crate::{Error, Result};

pub mod rest;
pub mod sqlite;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// One stored row, keyed by column name
pub type Row = serde_json::Map<String, Value>;

/// Entity tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Niches,
    Ideas,
    Highlights,
    Subreddits,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Niches,
        Table::Ideas,
        Table::Highlights,
        Table::Subreddits,
    ];

    /// Stored table name
    pub fn name(self) -> &'static str {
        match self {
            Table::Niches => "niches",
            Table::Ideas => "ideas",
            Table::Highlights => "highlights",
            Table::Subreddits => "subreddits",
        }
    }

    /// Singular display name used in response messages ("Niche not found")
    pub fn label(self) -> &'static str {
        match self {
            Table::Niches => "Niche",
            Table::Ideas => "Idea",
            Table::Highlights => "Highlight",
            Table::Subreddits => "Subreddit",
        }
    }

    pub fn columns(self) -> &'static [ColumnDefinition] {
        expected_columns(self)
    }

    pub fn column(self, name: &str) -> Option<&'static ColumnDefinition> {
        self.columns().iter().find(|c| c.name == name)
    }
}

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Sort order for a select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub descending: bool,
}

/// Filters plus ordering for [`Store::select`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Add a filter only when a value is present and non-empty
    pub fn filter_opt(self, column: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.filter(column, v),
            _ => self,
        }
    }

    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            descending: true,
        });
        self
    }
}

/// Row-level access to the entity tables
///
/// Implementations hold no domain state; every call is an independent
/// round trip to the underlying store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for logs
    fn backend(&self) -> &'static str;

    /// All rows matching every filter, in the requested order
    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>>;

    /// The row with this id, if any
    async fn fetch_by_id(&self, table: Table, id: &str) -> Result<Option<Row>>;

    /// Number of rows matching every filter
    async fn count(&self, table: Table, filters: &[Filter]) -> Result<i64>;

    /// Insert a row and return it as stored (with generated id and timestamps)
    async fn insert(&self, table: Table, row: Row) -> Result<Row>;

    /// Overwrite the given columns of one row and return it as stored.
    ///
    /// Fails with [`Error::NotFound`] when no row has this id.
    async fn update(&self, table: Table, id: &str, row: Row) -> Result<Row>;

    /// Delete one row. Deleting a missing row is not an error.
    async fn delete(&self, table: Table, id: &str) -> Result<()>;
}

/// Serialize a write record into a row
pub fn to_row<T: Serialize>(value: &T) -> Result<Row> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        other => Err(Error::Internal(format!(
            "Expected a JSON object for a row, got {}",
            other
        ))),
    }
}

/// Deserialize a stored row into a model
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Open the store selected by the configured URL
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.backend()? {
        StoreBackend::Sqlite => Arc::new(SqliteStore::connect(&config.store_url).await?),
        StoreBackend::Rest => Arc::new(RestStore::new(&config.store_url, &config.access_key)?),
    };

    info!(backend = store.backend(), "Persistence gateway ready");
    Ok(store)
}
