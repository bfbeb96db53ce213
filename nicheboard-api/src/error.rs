//! Error mapping for HTTP handlers
//!
//! Every handler failure funnels through `ApiError`, which renders the
//! `{"success": false, "error": ...}` envelope. Store failures are logged
//! with their cause and replaced by a generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nicheboard_common::api::ErrorResponse;
use nicheboard_common::Table;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::ServiceError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body or field (400)
    #[error("{0}")]
    Validation(String),

    /// Entity not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Storage operation failed (500)
    #[error("{0}")]
    OperationFailed(String),
}

impl ApiError {
    pub fn not_found(table: Table) -> Self {
        ApiError::NotFound(format!("{} not found", table.label()))
    }

    /// Mapping for single-entity reads: any failure is reported as not found
    pub fn lookup(table: Table) -> impl FnOnce(ServiceError) -> ApiError {
        move |err| {
            warn!(table = table.name(), error = %err, "Lookup failed");
            ApiError::not_found(table)
        }
    }

    /// Mapping for lists and writes: validation passes through, store
    /// failures become `message`
    pub fn operation(message: &'static str) -> impl FnOnce(ServiceError) -> ApiError {
        move |err| match err {
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            ServiceError::Store(e) => {
                error!(error = %e, "{}", message);
                ApiError::OperationFailed(message.to_string())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
