//! Niche endpoints
//!
//! - GET    /api/niches            list with dependent counts
//! - POST   /api/niches            create
//! - GET    /api/niches/:id        fetch one
//! - PUT    /api/niches/:id        full update
//! - DELETE /api/niches/:id        delete (dependents are kept)
//! - GET    /api/niches/slug/:slug fetch one by slug

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use nicheboard_common::api::{DataResponse, MessageResponse};
use nicheboard_common::db::{Niche, NicheWithCounts};
use nicheboard_common::Table;

use crate::error::{ApiError, ApiResult};
use crate::services::niches::{self, NichePayload};
use crate::AppState;

pub async fn list_niches(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<NicheWithCounts>>>> {
    let niches = niches::list(state.store())
        .await
        .map_err(ApiError::operation("Failed to fetch niches"))?;

    Ok(Json(DataResponse::new(niches)))
}

pub async fn get_niche(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Niche>>> {
    let niche = niches::get(state.store(), &id)
        .await
        .map_err(ApiError::lookup(Table::Niches))?
        .ok_or_else(|| ApiError::not_found(Table::Niches))?;

    Ok(Json(DataResponse::new(niche)))
}

pub async fn get_niche_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<DataResponse<Niche>>> {
    let niche = niches::get_by_slug(state.store(), &slug)
        .await
        .map_err(ApiError::lookup(Table::Niches))?
        .ok_or_else(|| ApiError::not_found(Table::Niches))?;

    Ok(Json(DataResponse::new(niche)))
}

pub async fn create_niche(
    State(state): State<AppState>,
    payload: Result<Json<NichePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<NicheWithCounts>>)> {
    let Json(payload) = payload?;
    let niche = niches::create(state.store(), payload)
        .await
        .map_err(ApiError::operation("Failed to create niche"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(niche))))
}

pub async fn update_niche(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NichePayload>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Niche>>> {
    let Json(payload) = payload?;
    let niche = niches::update(state.store(), &id, payload)
        .await
        .map_err(ApiError::operation("Failed to update niche"))?;

    Ok(Json(DataResponse::new(niche)))
}

pub async fn delete_niche(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    niches::delete(state.store(), &id)
        .await
        .map_err(ApiError::operation("Failed to delete niche"))?;

    Ok(Json(MessageResponse::new("Niche deleted successfully")))
}

/// Build niche routes
pub fn niche_routes() -> Router<AppState> {
    Router::new()
        .route("/api/niches", get(list_niches).post(create_niche))
        .route(
            "/api/niches/:id",
            get(get_niche).put(update_niche).delete(delete_niche),
        )
        .route("/api/niches/slug/:slug", get(get_niche_by_slug))
}
