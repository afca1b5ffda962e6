//! HTTP error responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use pnlcard_core::{GainError, ValidationErrors};
use pnlcard_render::RenderError;
use serde_json::{json, Value};
use tracing::{debug, error};

/// Error that renders as a JSON body with a matching status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": msg.into() }),
        }
    }

    pub fn render(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": "Failed to render card", "detail": detail.into() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        debug!("Rejected request: {}", errors);
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": "Validation failed", "details": errors.0 }),
        }
    }
}

impl From<GainError> for ApiError {
    fn from(err: GainError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        error!("Card rendering failed: {}", err);
        ApiError::render(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            body: json!({ "error": rejection.body_text() }),
        }
    }
}
