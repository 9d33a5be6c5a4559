use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use crate::errors::{AppError, StoreError};

// Maps every AppError onto a fixed status code with a short plain-text body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Conflict(msg) => {
                tracing::debug!("Rejected with conflict: {}", msg);
                (StatusCode::BAD_REQUEST, "User already exists").into_response()
            }

            AppError::Unauthorized => (
                StatusCode::FORBIDDEN,
                "Invalid credentials"
            ).into_response(),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                msg
            ).into_response(),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Bad Request: {}", msg)
            ).into_response(),

            AppError::Store(err) => convert_store_error(err),

            AppError::File(e) => {
                tracing::error!("Template error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load page").into_response()
            }

            AppError::Hash(e) => {
                tracing::error!("Password hashing failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

// Save failures leave the in-memory change in place, so the client only learns the write failed.
fn convert_store_error(err: StoreError) -> Response {
    tracing::error!("Failed to persist changes: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to save changes"
    ).into_response()
}
