//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::chat::ChatError;
use crate::db::StoreError;
use crate::secrets::SecretError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping. Upstream failures are wrapped,
/// never recovered.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    SecretUnavailable(#[from] SecretError),
    #[error(transparent)]
    ChatRequestFailed(#[from] ChatError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::SecretUnavailable(e) => {
                tracing::error!(error = %e, "secret store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SECRET_UNAVAILABLE",
                    "Credential lookup failed".to_string(),
                )
            }
            ApiError::ChatRequestFailed(e) => {
                tracing::error!(error = %e, "chat API failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CHAT_REQUEST_FAILED",
                    "Chat completion failed".to_string(),
                )
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "conversation store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "Conversation store failure".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("Missing userKey".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "Missing userKey");
    }

    #[tokio::test]
    async fn secret_error_returns_500_and_hides_detail() {
        let err: ApiError = SecretError::NotFound("prod/api/key/chatgpt".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "SECRET_UNAVAILABLE");
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("chatgpt"));
    }

    #[tokio::test]
    async fn chat_error_returns_500() {
        let err: ApiError = ChatError::MissingAnswer.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "CHAT_REQUEST_FAILED");
    }

    #[tokio::test]
    async fn store_error_returns_500() {
        let err: ApiError = StoreError::InvalidTimestamp("bogus".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "STORE_ERROR");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}
