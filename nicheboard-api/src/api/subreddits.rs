//! Subreddit endpoints: /api/subreddits and /api/subreddits/:id

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use nicheboard_common::api::{DataResponse, MessageResponse};
use nicheboard_common::db::Subreddit;
use nicheboard_common::Table;

use super::ListParams;
use crate::error::{ApiError, ApiResult};
use crate::services::subreddits::{self, SubredditPayload};
use crate::AppState;

/// GET /api/subreddits?nicheId=...
pub async fn list_subreddits(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<DataResponse<Vec<Subreddit>>>> {
    let subreddits = subreddits::list(state.store(), params.niche_id.as_deref())
        .await
        .map_err(ApiError::operation("Failed to fetch subreddits"))?;

    Ok(Json(DataResponse::new(subreddits)))
}

pub async fn get_subreddit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Subreddit>>> {
    let subreddit = subreddits::get(state.store(), &id)
        .await
        .map_err(ApiError::lookup(Table::Subreddits))?
        .ok_or_else(|| ApiError::not_found(Table::Subreddits))?;

    Ok(Json(DataResponse::new(subreddit)))
}

pub async fn create_subreddit(
    State(state): State<AppState>,
    payload: Result<Json<SubredditPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Subreddit>>)> {
    let Json(payload) = payload?;
    let subreddit = subreddits::create(state.store(), payload)
        .await
        .map_err(ApiError::operation("Failed to create subreddit"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(subreddit))))
}

pub async fn update_subreddit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SubredditPayload>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Subreddit>>> {
    let Json(payload) = payload?;
    let subreddit = subreddits::update(state.store(), &id, payload)
        .await
        .map_err(ApiError::operation("Failed to update subreddit"))?;

    Ok(Json(DataResponse::new(subreddit)))
}

pub async fn delete_subreddit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    subreddits::delete(state.store(), &id)
        .await
        .map_err(ApiError::operation("Failed to delete subreddit"))?;

    Ok(Json(MessageResponse::new("Subreddit deleted successfully")))
}

/// Build subreddit routes
pub fn subreddit_routes() -> Router<AppState> {
    Router::new()
        .route("/api/subreddits", get(list_subreddits).post(create_subreddit))
        .route(
            "/api/subreddits/:id",
            get(get_subreddit)
                .put(update_subreddit)
                .delete(delete_subreddit),
        )
}
