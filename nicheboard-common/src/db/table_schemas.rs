//! Table Schema Definitions
//!
//! Single source of truth for the four entity tables. The SQLite backend uses
//! these definitions both to create tables and to validate/decode columns, so a
//! column added here is picked up everywhere.
//!
//! No foreign keys are declared: deleting a niche or idea leaves dependent rows
//! in place (orphan policy).

use crate::store::Table;

/// SQLite storage class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
}

impl ColumnType {
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
        }
    }
}

/// Column definition with SQL constraints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: &'static str,
    /// Storage class
    pub sql_type: ColumnType,
    /// NOT NULL constraint
    pub not_null: bool,
    /// PRIMARY KEY constraint
    pub primary_key: bool,
    /// UNIQUE constraint
    pub unique: bool,
    /// DEFAULT expression
    pub default_value: Option<&'static str>,
}

impl ColumnDefinition {
    /// Create new column definition
    pub const fn new(name: &'static str, sql_type: ColumnType) -> Self {
        Self {
            name,
            sql_type,
            not_null: false,
            primary_key: false,
            unique: false,
            default_value: None,
        }
    }

    /// Mark column as PRIMARY KEY
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark column as NOT NULL
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Mark column as UNIQUE
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set DEFAULT expression
    pub const fn default(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Render the column clause of a CREATE TABLE statement
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.sql());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = self.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        sql
    }
}

/// Storage-side timestamp default (RFC 3339, millisecond precision, UTC)
const NOW: &str = "(strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))";

use ColumnType::{Integer, Real, Text};

const NICHES: &[ColumnDefinition] = &[
    ColumnDefinition::new("id", Text).primary_key(),
    ColumnDefinition::new("name", Text).not_null(),
    ColumnDefinition::new("slug", Text).not_null().unique(),
    ColumnDefinition::new("description", Text),
    ColumnDefinition::new("created_at", Text).not_null().default(NOW),
    ColumnDefinition::new("updated_at", Text).not_null().default(NOW),
];

const IDEAS: &[ColumnDefinition] = &[
    ColumnDefinition::new("id", Text).primary_key(),
    ColumnDefinition::new("title", Text).not_null(),
    ColumnDefinition::new("problem", Text),
    ColumnDefinition::new("solution", Text),
    ColumnDefinition::new("audience", Text),
    ColumnDefinition::new("status", Text).not_null().default("'Backlog'"),
    ColumnDefinition::new("impact", Integer).not_null().default("1"),
    ColumnDefinition::new("confidence", Integer).not_null().default("1"),
    ColumnDefinition::new("effort", Integer).not_null().default("1"),
    ColumnDefinition::new("ice_score", Real).not_null().default("1"),
    ColumnDefinition::new("notes", Text),
    ColumnDefinition::new("source_url", Text),
    ColumnDefinition::new("tags", Text),
    ColumnDefinition::new("niche_id", Text).not_null(),
    ColumnDefinition::new("created_at", Text).not_null().default(NOW),
    ColumnDefinition::new("updated_at", Text).not_null().default(NOW),
];

const HIGHLIGHTS: &[ColumnDefinition] = &[
    ColumnDefinition::new("id", Text).primary_key(),
    ColumnDefinition::new("quote", Text).not_null(),
    ColumnDefinition::new("permalink", Text),
    ColumnDefinition::new("subreddit", Text),
    ColumnDefinition::new("author", Text),
    ColumnDefinition::new("upvotes", Integer),
    ColumnDefinition::new("notes", Text),
    ColumnDefinition::new("tags", Text),
    ColumnDefinition::new("niche_id", Text).not_null(),
    ColumnDefinition::new("idea_id", Text),
    ColumnDefinition::new("created_at", Text).not_null().default(NOW),
    ColumnDefinition::new("updated_at", Text).not_null().default(NOW),
];

const SUBREDDITS: &[ColumnDefinition] = &[
    ColumnDefinition::new("id", Text).primary_key(),
    ColumnDefinition::new("name", Text).not_null(),
    ColumnDefinition::new("url", Text).not_null(),
    ColumnDefinition::new("subscriber_count", Integer).not_null().default("0"),
    ColumnDefinition::new("notes", Text),
    ColumnDefinition::new("niche_id", Text).not_null(),
    ColumnDefinition::new("created_at", Text).not_null().default(NOW),
    ColumnDefinition::new("updated_at", Text).not_null().default(NOW),
];

/// Expected columns for a table, in creation order
pub fn expected_columns(table: Table) -> &'static [ColumnDefinition] {
    match table {
        Table::Niches => NICHES,
        Table::Ideas => IDEAS,
        Table::Highlights => HIGHLIGHTS,
        Table::Subreddits => SUBREDDITS,
    }
}

/// Columns that get a secondary index
pub fn indexed_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Niches => &[],
        Table::Ideas | Table::Subreddits => &["niche_id"],
        Table::Highlights => &["niche_id", "idea_id"],
    }
}

/// CREATE TABLE IF NOT EXISTS statement for a table
pub fn create_table_sql(table: Table) -> String {
    let columns: Vec<String> = expected_columns(table)
        .iter()
        .map(ColumnDefinition::to_sql)
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        table.name(),
        columns.join(",\n    ")
    )
}
