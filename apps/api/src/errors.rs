use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::portfolio::validation::ValidationReport;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Required fields are missing; blocks save, export and download.
    #[error("Form has {} invalid field(s)", .0.errors.len())]
    InvalidForm(ValidationReport),

    #[error("Error importing JSON: {0}")]
    InvalidImport(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Image too large: {0}")]
    ImageTooLarge(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidForm(report) => {
                let body = Json(json!({
                    "error": {
                        "code": "INVALID_FORM",
                        "message": self.to_string(),
                        "fields": report.errors,
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidImport(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_IMPORT", self.to_string())
            }
            AppError::UnsupportedImage(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_IMAGE",
                msg.clone(),
            ),
            AppError::ImageTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE", msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Cache(e) => {
                tracing::error!("Redis error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CACHE_ERROR",
                    "A draft storage error occurred".to_string(),
                )
            }
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::validation::FieldError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidImport("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::UnsupportedImage("x".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (AppError::ImageTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (AppError::S3("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_invalid_form_message_counts_fields() {
        let report = ValidationReport {
            valid: false,
            errors: vec![FieldError {
                field: "bio".into(),
                message: "Bio is required".into(),
            }],
        };
        let err = AppError::InvalidForm(report);
        assert_eq!(err.to_string(), "Form has 1 invalid field(s)");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
