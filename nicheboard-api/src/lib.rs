//! nicheboard-api library
//!
//! JSON API over niches, ideas, highlights and subreddits. The router is built
//! here so integration tests can drive it without binding a socket.

use axum::Router;
use nicheboard_common::Store;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway (SQLite or hosted store)
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::niche_routes())
        .merge(api::idea_routes())
        .merge(api::highlight_routes())
        .merge(api::subreddit_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
