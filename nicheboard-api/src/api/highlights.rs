//! Highlight endpoints: /api/highlights and /api/highlights/:id

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use nicheboard_common::api::{DataResponse, MessageResponse};
use nicheboard_common::db::Highlight;
use nicheboard_common::Table;

use super::ListParams;
use crate::error::{ApiError, ApiResult};
use crate::services::highlights::{self, HighlightPayload};
use crate::AppState;

/// GET /api/highlights?nicheId=...&ideaId=...
pub async fn list_highlights(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<DataResponse<Vec<Highlight>>>> {
    let highlights = highlights::list(
        state.store(),
        params.niche_id.as_deref(),
        params.idea_id.as_deref(),
    )
    .await
    .map_err(ApiError::operation("Failed to fetch highlights"))?;

    Ok(Json(DataResponse::new(highlights)))
}

pub async fn get_highlight(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Highlight>>> {
    let highlight = highlights::get(state.store(), &id)
        .await
        .map_err(ApiError::lookup(Table::Highlights))?
        .ok_or_else(|| ApiError::not_found(Table::Highlights))?;

    Ok(Json(DataResponse::new(highlight)))
}

pub async fn create_highlight(
    State(state): State<AppState>,
    payload: Result<Json<HighlightPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Highlight>>)> {
    let Json(payload) = payload?;
    let highlight = highlights::create(state.store(), payload)
        .await
        .map_err(ApiError::operation("Failed to create highlight"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(highlight))))
}

pub async fn update_highlight(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HighlightPayload>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Highlight>>> {
    let Json(payload) = payload?;
    let highlight = highlights::update(state.store(), &id, payload)
        .await
        .map_err(ApiError::operation("Failed to update highlight"))?;

    Ok(Json(DataResponse::new(highlight)))
}

pub async fn delete_highlight(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    highlights::delete(state.store(), &id)
        .await
        .map_err(ApiError::operation("Failed to delete highlight"))?;

    Ok(Json(MessageResponse::new("Highlight deleted successfully")))
}

/// Build highlight routes
pub fn highlight_routes() -> Router<AppState> {
    Router::new()
        .route("/api/highlights", get(list_highlights).post(create_highlight))
        .route(
            "/api/highlights/:id",
            get(get_highlight)
                .put(update_highlight)
                .delete(delete_highlight),
        )
}
