//! API error type with HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_validator::{RowError, ValidationErrors};
use serde_json::json;
use storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, unknown, or expired session; wrong credentials (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Field-level violations in a JSON payload (400)
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Unparseable rows in a CSV upload (400)
    #[error("CSV upload has {} invalid row(s)", .0.len())]
    Csv(Vec<RowError>),

    /// Malformed request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) | ApiError::Csv(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) | ApiError::Storage(StorageError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Storage(StorageError::Conflict(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::Lock(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Bare array of violations
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            ApiError::Csv(rows) => {
                let body = json!({
                    "error": format!("CSV upload has {} invalid row(s)", rows.len()),
                    "rowErrors": rows,
                });
                (status, Json(body)).into_response()
            }
            ApiError::Storage(StorageError::Lock(ref reason)) => {
                tracing::error!(error = %reason, "Storage lock poisoned");
                let body = json!({
                    "error": "An internal storage error occurred",
                    "status": status.as_u16(),
                });
                (status, Json(body)).into_response()
            }
            other => {
                let body = json!({
                    "error": other.to_string(),
                    "status": status.as_u16(),
                });
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::ValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage(StorageError::Conflict("taken".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage(StorageError::Lock("poisoned".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::NotFound("metrics".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Storage(StorageError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_lock_error_hides_reason() {
        let response =
            ApiError::Storage(StorageError::Lock("poisoned by worker 7".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 500);
        assert!(!body["error"].as_str().unwrap().contains("worker 7"));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Validation(ValidationErrors::single(ValidationError::MissingField(
            "value",
        )));
        assert_eq!(err.to_string(), "1 validation error(s): Missing required field: value");
        assert_eq!(ApiError::Csv(Vec::new()).to_string(), "CSV upload has 0 invalid row(s)");
    }
}
