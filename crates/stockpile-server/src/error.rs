//! Mapping of service errors onto HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stockpile_core::CoreError;
use tracing::error;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error returned by every handler.
#[derive(Debug)]
pub enum AppError {
    /// A failure raised by the item service.
    Core(CoreError),
    /// The request body or query string could not be decoded.
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Core(CoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Item not found".to_string())
            }
            Self::Core(CoreError::Validation(message)) | Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            Self::Core(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
