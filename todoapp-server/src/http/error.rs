//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses `{"error": kind, "message": text}`
//! with the matching status code.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use todoapp_core::{StoreError, TodoError, ValidationError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be decoded (400)
    BadRequest { message: String },

    /// Validation failed (400)
    Validation(ValidationError),

    /// Todo not found (404)
    NotFound,

    /// Store failure (500, logged)
    Internal(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": message
                }),
            ),
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": "Todo not found"
                }),
            ),
            Self::Internal(e) => {
                // Log the actual error, return generic message
                if e.is_serialization_failure() {
                    tracing::warn!(sqlstate = ?e.sqlstate(), "transaction conflict: {}", e);
                } else {
                    tracing::error!("Store error: {}", e);
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "Internal error"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<TodoError> for ApiError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::NotFound { .. } => Self::NotFound,
            TodoError::Validation(e) => Self::Validation(e),
            TodoError::Unexpected(e) => Self::Internal(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use todoapp_core::TodoId;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::from(TodoError::from(ValidationError::Empty { field: "text" }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "text cannot be empty");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::from(TodoError::NotFound {
            id: TodoId::new(7),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Todo not found");
    }

    #[tokio::test]
    async fn store_failure_is_500_without_details() {
        let err = ApiError::from(TodoError::Unexpected(StoreError::database(
            std::io::Error::new(std::io::ErrorKind::Other, "could not serialize access"),
            Some("40001".into()),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "Internal error");
    }

    #[tokio::test]
    async fn exhausted_pool_is_500() {
        let response = ApiError::Internal(StoreError::ResourceExhausted).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
