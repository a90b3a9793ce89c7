//! Mock API error types and conversions

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error returned by mock handlers
#[derive(Debug)]
pub enum MockError {
    /// 404 Not Found
    NotFound(String),
    /// 422 Unprocessable Entity
    Unprocessable(String),
}

/// Error body, `{"detail": "..."}`
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl MockError {
    pub fn machine_not_found() -> Self {
        MockError::NotFound("Machine not found".to_string())
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            MockError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            MockError::Unprocessable(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
        };
        tracing::debug!(status = status.as_u16(), %detail, "Mock client error");
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<JsonRejection> for MockError {
    fn from(rejection: JsonRejection) -> Self {
        MockError::Unprocessable(rejection.body_text())
    }
}
