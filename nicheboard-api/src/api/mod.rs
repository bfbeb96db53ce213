//! HTTP API handlers for nicheboard-api

use serde::Deserialize;

pub mod health;
pub mod highlights;
pub mod ideas;
pub mod niches;
pub mod subreddits;

pub use health::health_routes;
pub use highlights::highlight_routes;
pub use ideas::idea_routes;
pub use niches::niche_routes;
pub use subreddits::subreddit_routes;

/// Query parameters accepted by the list endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(alias = "niche_id")]
    pub niche_id: Option<String>,
    /// Highlights only
    #[serde(alias = "idea_id")]
    pub idea_id: Option<String>,
}
