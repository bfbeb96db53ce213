//! Database models and SQLite initialization

pub mod init;
pub mod models;
pub mod table_schemas;

pub use init::*;
pub use models::*;
