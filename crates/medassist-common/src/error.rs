use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message shown to clients when the generation service is not configured.
pub const CONFIGURATION_ERROR_MESSAGE: &str =
    "Configuration error. Please check your API key setup.";

/// Message shown to clients when a request fails unexpectedly.
pub const INTERNAL_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Errors surfaced at the HTTP boundary.
///
/// Runtime faults inside the composer never reach this type; the chat handler
/// turns those into a degraded but well-formed reply instead.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input rejected before any core logic runs.
    #[error("{0}")]
    BadRequest(String),

    /// A required external-service credential is missing or invalid.
    /// The detail is logged, never returned to the client.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected fault while handling a request. The detail is logged,
    /// never returned to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(msg) => json!({ "error": msg }),
            ApiError::Configuration(detail) => {
                tracing::error!(%detail, "Configuration error");
                json!({ "error": CONFIGURATION_ERROR_MESSAGE, "status": "error" })
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                json!({ "error": INTERNAL_ERROR_MESSAGE, "status": "error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_has_no_status_field() {
        let resp = ApiError::BadRequest("Message cannot be empty".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Message cannot be empty");
        assert!(json.get("status").is_none());
    }

    #[tokio::test]
    async fn test_configuration_error_hides_detail() {
        let resp = ApiError::Configuration("GEMINI_API_KEY is not set".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], CONFIGURATION_ERROR_MESSAGE);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let resp = ApiError::Internal("handler panicked: index out of bounds".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], INTERNAL_ERROR_MESSAGE);
        assert_eq!(json["status"], "error");
    }
}
