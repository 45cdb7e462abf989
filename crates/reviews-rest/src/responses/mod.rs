//! API response types.

use reviews_core::{ErrorResponse, ReviewsError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error envelope returned by every failing endpoint.
///
/// Successful endpoints answer with their bare body, so `success` is
/// always `false` here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub error: ErrorResponse,
}

impl ApiResponse {
    /// Creates an error response.
    pub fn error(error: ErrorResponse) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Builds an error envelope response with an explicit status.
pub fn error_response(status: StatusCode, error: ErrorResponse) -> Response {
    (status, Json(ApiResponse::error(error))).into_response()
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub ReviewsError);

impl From<ReviewsError> for AppError {
    fn from(err: ReviewsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        error_response(status, ErrorResponse::from_error(&self.0))
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}
