//! SQLite backend for the persistence gateway
//!
//! SQL is assembled from the declared table schemas; column names in filters,
//! orderings and written rows are checked against those schemas before they
//! reach a statement, and all values are bound as parameters.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row as _, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::{Filter, Row, SelectQuery, Store, Table};
use crate::db::init::init_database;
use crate::db::table_schemas::{ColumnDefinition, ColumnType};
use crate::{Error, Result};

/// Persistence gateway over a local SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (and initialize) the database at a `sqlite:` URL
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(init_database(url).await?))
    }

    /// Fresh private in-memory database
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>> {
        let mut sql = format!("SELECT {} FROM {}", select_list(table), table.name());
        sql.push_str(&where_clause(table, &query.filters)?);

        match query.order {
            Some(order) => {
                checked_column(table, order.column)?;
                let direction = if order.descending { "DESC" } else { "ASC" };
                // rowid breaks ties in insertion order
                sql.push_str(&format!(
                    " ORDER BY {} {}, rowid {}",
                    order.column, direction, direction
                ));
            }
            None => sql.push_str(" ORDER BY rowid"),
        }

        let mut q = sqlx::query(&sql);
        for filter in &query.filters {
            q = q.bind(filter.value.clone());
        }

        let rows = q.fetch_all(&self.pool).await?;
        debug!(table = table.name(), rows = rows.len(), "select");

        rows.iter().map(|row| decode_row(table, row)).collect()
    }

    async fn fetch_by_id(&self, table: Table, id: &str) -> Result<Option<Row>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            select_list(table),
            table.name()
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| decode_row(table, &r)).transpose()
    }

    async fn count(&self, table: Table, filters: &[Filter]) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            table.name(),
            where_clause(table, filters)?
        );

        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for filter in filters {
            q = q.bind(filter.value.clone());
        }

        Ok(q.fetch_one(&self.pool).await?)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row> {
        row.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        let id = match row.get("id") {
            Some(Value::String(id)) => id.clone(),
            _ => return Err(Error::InvalidInput("Row id must be a string".to_string())),
        };

        let mut columns = Vec::with_capacity(row.len());
        for column in row.keys() {
            columns.push(checked_column(table, column)?.name);
        }
        let placeholders = vec!["?"; columns.len()].join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name(),
            columns.join(", "),
            placeholders
        );

        let mut q = sqlx::query(&sql);
        for value in row.values() {
            q = bind_value(q, value);
        }
        q.execute(&self.pool).await?;

        debug!(table = table.name(), id = %id, "insert");

        self.fetch_by_id(table, &id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Inserted {} {} not readable", table.label(), id)))
    }

    async fn update(&self, table: Table, id: &str, row: Row) -> Result<Row> {
        let mut assignments = Vec::with_capacity(row.len());
        let mut values = Vec::with_capacity(row.len());
        for (column, value) in &row {
            if column == "id" {
                continue;
            }
            assignments.push(format!("{} = ?", checked_column(table, column)?.name));
            values.push(value);
        }

        if !assignments.is_empty() {
            let sql = format!(
                "UPDATE {} SET {} WHERE id = ?",
                table.name(),
                assignments.join(", ")
            );

            let mut q = sqlx::query(&sql);
            for value in values {
                q = bind_value(q, value);
            }
            let result = q.bind(id).execute(&self.pool).await?;

            if result.rows_affected() == 0 {
                return Err(Error::NotFound(format!("{} {}", table.label(), id)));
            }
        }

        debug!(table = table.name(), id = %id, "update");

        self.fetch_by_id(table, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} {}", table.label(), id)))
    }

    async fn delete(&self, table: Table, id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", table.name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        debug!(
            table = table.name(),
            id = %id,
            deleted = result.rows_affected(),
            "delete"
        );
        Ok(())
    }
}

fn checked_column(table: Table, name: &str) -> Result<&'static ColumnDefinition> {
    table.column(name).ok_or_else(|| {
        Error::InvalidInput(format!("Unknown column {}.{}", table.name(), name))
    })
}

fn select_list(table: Table) -> String {
    table
        .columns()
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn where_clause(table: Table, filters: &[Filter]) -> Result<String> {
    if filters.is_empty() {
        return Ok(String::new());
    }

    let mut conditions = Vec::with_capacity(filters.len());
    for filter in filters {
        conditions.push(format!("{} = ?", checked_column(table, filter.column)?.name));
    }

    Ok(format!(" WHERE {}", conditions.join(" AND ")))
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}

/// Convert a SQLite row to JSON using the declared column types
fn decode_row(table: Table, row: &SqliteRow) -> Result<Row> {
    let mut out = Row::new();

    for column in table.columns() {
        let value = match column.sql_type {
            ColumnType::Text => row
                .try_get::<Option<String>, _>(column.name)?
                .map(Value::String),
            ColumnType::Integer => row
                .try_get::<Option<i64>, _>(column.name)?
                .map(Value::from),
            ColumnType::Real => row
                .try_get::<Option<f64>, _>(column.name)?
                .map(Value::from),
        };
        out.insert(column.name.to_string(), value.unwrap_or(Value::Null));
    }

    Ok(out)
}
