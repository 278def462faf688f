use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

/// JSON API error carrying a fixed user-facing message. The optional detail
/// is logged at response time and never serialized to the caller.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    message: &'static str,
    detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: &'static str, detail: Option<String>) -> Self {
        Self { status, message, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if let Some(detail) = &self.detail {
            error!(status = %self.status, detail = %detail, "request failed");
        }
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}
