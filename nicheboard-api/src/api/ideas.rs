//! Idea endpoints: /api/ideas and /api/ideas/:id

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use nicheboard_common::api::{DataResponse, MessageResponse};
use nicheboard_common::db::Idea;
use nicheboard_common::Table;

use super::ListParams;
use crate::error::{ApiError, ApiResult};
use crate::services::ideas::{self, IdeaPayload};
use crate::AppState;

/// GET /api/ideas?nicheId=...
pub async fn list_ideas(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<DataResponse<Vec<Idea>>>> {
    let ideas = ideas::list(state.store(), params.niche_id.as_deref())
        .await
        .map_err(ApiError::operation("Failed to fetch ideas"))?;

    Ok(Json(DataResponse::new(ideas)))
}

pub async fn get_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Idea>>> {
    let idea = ideas::get(state.store(), &id)
        .await
        .map_err(ApiError::lookup(Table::Ideas))?
        .ok_or_else(|| ApiError::not_found(Table::Ideas))?;

    Ok(Json(DataResponse::new(idea)))
}

pub async fn create_idea(
    State(state): State<AppState>,
    payload: Result<Json<IdeaPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Idea>>)> {
    let Json(payload) = payload?;
    let idea = ideas::create(state.store(), payload)
        .await
        .map_err(ApiError::operation("Failed to create idea"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(idea))))
}

pub async fn update_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<IdeaPayload>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Idea>>> {
    let Json(payload) = payload?;
    let idea = ideas::update(state.store(), &id, payload)
        .await
        .map_err(ApiError::operation("Failed to update idea"))?;

    Ok(Json(DataResponse::new(idea)))
}

pub async fn delete_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    ideas::delete(state.store(), &id)
        .await
        .map_err(ApiError::operation("Failed to delete idea"))?;

    Ok(Json(MessageResponse::new("Idea deleted successfully")))
}

/// Build idea routes
pub fn idea_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ideas", get(list_ideas).post(create_idea))
        .route(
            "/api/ideas/:id",
            get(get_idea).put(update_idea).delete(delete_idea),
        )
}
