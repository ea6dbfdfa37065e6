//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error detail in the API response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
///
/// The remote station API answers in the same shape, so the envelope is also
/// decoded from upstream bodies.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }
}

impl<T> ApiResponse<T> {
    /// Unwrap an upstream envelope: a reported error becomes `AppError::Upstream`,
    /// an absent `data` field becomes `Ok(None)`.
    pub fn into_data(self) -> Result<Option<T>, AppError> {
        match self.error {
            Some(err) => Err(AppError::Upstream(err.message)),
            None => Ok(self.data),
        }
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Upstream API reported an error");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Http(e) => {
                tracing::error!(error = %e, "Upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    "The station API is unavailable".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["data"], "hello");
        assert!(json["error"].is_null());
    }

    #[tokio::test]
    async fn error_response_uses_envelope() {
        let response = AppError::NotFound("Item not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Item not found");
    }

    #[test]
    fn upstream_envelope_with_error_fails() {
        let envelope: ApiResponse<Vec<i32>> =
            serde_json::from_str(r#"{"data": null, "error": {"message": "boom"}}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(err.to_string(), "Upstream error: boom");
    }

    #[test]
    fn upstream_envelope_without_data_is_absent() {
        let envelope: ApiResponse<Vec<i32>> = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.into_data().unwrap(), None);
    }

    #[test]
    fn upstream_envelope_with_data() {
        let envelope: ApiResponse<Vec<i32>> =
            serde_json::from_str(r#"{"data": [1, 2, 3]}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("amount must be positive".to_string());
        assert_eq!(err.to_string(), "Validation error: amount must be positive");
    }

    #[test]
    fn upstream_error_maps_to_bad_gateway() {
        let response = AppError::Upstream("tanks offline".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_error_maps_to_500() {
        let response = AppError::Internal("oops".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
