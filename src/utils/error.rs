use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Map an unexpected repository failure, keeping the detail server-side.
    pub fn db(err: anyhow::Error) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

fn error_body(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { success: false, error })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => {
                tracing::warn!("Validation failed: {}", msg);
                error_body(StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                error_body(StatusCode::UNAUTHORIZED, msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                error_body(StatusCode::FORBIDDEN, msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                error_body(StatusCode::NOT_FOUND, msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                error_body(StatusCode::BAD_REQUEST, msg)
            }
            ApiError::DatabaseError(msg) | ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                // Detail only surfaces in debug builds.
                let exposed = if cfg!(debug_assertions) {
                    msg
                } else {
                    "Internal server error".to_string()
                };
                error_body(StatusCode::INTERNAL_SERVER_ERROR, exposed)
            }
        }
    }
}

/// Converts an escaped panic into the standard 500 envelope instead of a
/// dropped connection.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}
