//! # Nicheboard Common Library
//!
//! Shared code for the Nicheboard service and its admin tooling:
//! - Entity models (niches, ideas, highlights, subreddits)
//! - Domain utilities (slugs, ICE scoring, tags, display formatting)
//! - API envelope types
//! - Configuration loading
//! - Persistence gateway (SQLite and hosted REST backends)

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod human_format;
pub mod scoring;
pub mod slug;
pub mod store;
pub mod tags;

pub use error::{Error, Result};
pub use scoring::calculate_ice_score;
pub use slug::slugify;
pub use store::{Store, Table};
pub use tags::{join_tags, parse_tags};
