//! Uniform response envelopes
//!
//! Every response body carries `success`. Successful responses carry `data`
//! (or `message` for deletes); failures carry `error`.

use serde::{Deserialize, Serialize};

/// Success envelope: `{"success": true, "data": ...}`
///
/// # Examples
///
/// ```
/// use nicheboard_common::api::types::DataResponse;
///
/// let body = serde_json::to_value(DataResponse::new(vec![1, 2, 3])).unwrap();
/// assert_eq!(body["success"], true);
/// assert_eq!(body["data"][2], 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope without payload: `{"success": true, "message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Failure envelope: `{"success": false, "error": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
