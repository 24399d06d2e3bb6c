use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::pet::PetError;

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    /// Name of the offending field, as it appears in the request body.
    #[schema(example = "name")]
    pub path: String,
    /// Why the value was rejected.
    #[schema(example = "At most 256 characters")]
    pub message: String,
}

impl FieldError {
    pub fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Request contains invalid fields")]
    pub message: String,
    /// Every rejected field, present only for field-level validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<FieldError>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            messages: Vec::new(),
        }
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// One or more body fields failed validation. Never empty.
    InvalidFields(Vec<FieldError>),
    TokenMissing,
    TokenInvalid,
    NotFound(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg),
            ),
            AppError::InvalidFields(fields) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    messages: fields,
                    ..ErrorBody::new("VALIDATION_ERROR", "Request contains invalid fields")
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_MISSING", "Authentication required"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_INVALID", "Invalid or expired token"),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg)),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<PetError> for AppError {
    fn from(err: PetError) -> Self {
        match err {
            PetError::NotFound => AppError::NotFound("Pet not found".into()),
            PetError::Validation(fields) => {
                tracing::warn!(count = fields.len(), "Pet rejected by validation");
                AppError::InvalidFields(fields)
            }
            PetError::Storage(e) => AppError::from(e),
        }
    }
}
