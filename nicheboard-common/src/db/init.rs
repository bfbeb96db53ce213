//! SQLite database initialization
//!
//! Opens (creating when missing) the SQLite database behind `SqliteStore` and
//! makes sure the four entity tables and their indexes exist.

use crate::db::table_schemas::{create_table_sql, indexed_columns};
use crate::store::Table;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

/// Open the database at `url` and create tables if needed.
///
/// Accepts any sqlx SQLite URL (`sqlite://path/to/nicheboard.db`,
/// `sqlite::memory:`). In-memory databases are pinned to a single connection
/// that is never recycled, since each connection would otherwise see its own
/// empty database.
pub async fn init_database(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?
    };

    if in_memory {
        info!("Opened in-memory database");
    } else {
        info!("Opened database: {}", url);
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
    }

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create every entity table and its indexes (idempotent)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    for table in Table::ALL {
        sqlx::query(&create_table_sql(table)).execute(pool).await?;

        for column in indexed_columns(table) {
            let sql = format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column})",
                table = table.name(),
                column = column
            );
            sqlx::query(&sql).execute(pool).await?;
        }

        debug!(table = table.name(), "Table ready");
    }

    Ok(())
}
