//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors returned by handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Body of a failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error al obtener las mediciones",
            ),
        };
        error!("Request failed: {}", self);

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
