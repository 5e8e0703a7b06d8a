//! Error types for the tours application
//!
//! Every failure is returned to the caller as an `AppError`. Validation
//! failures carry the per-field violations; storage, serialization and
//! hashing failures are reported as server errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more fields violate their constraints
    #[error("Validation error: {}", describe(.0))]
    Validation(ValidationErrors),

    /// Resource not found, or hidden from the caller
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Embedded database errors
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    /// Stored record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Password hashing failed; creation is aborted and not retried
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

macro_rules! database_error_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(err: $source) -> Self {
                    AppError::Database(redb::Error::from(err))
                }
            }
        )*
    };
}

database_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Joins every violation message, ordered by field name
pub fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |violation| match &violation.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Standard error response structure for API endpoints
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(status: &'static str, error: &str, message: &str) -> Self {
        Self {
            status,
            error: error.to_string(),
            message: message.to_string(),
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let response = match &self {
            AppError::Validation(errors) => {
                let message = format!("Invalid input data. {}", describe(errors));
                let mut body = ErrorResponse::new("fail", "VALIDATION_ERROR", &message);
                body.details = serde_json::to_value(errors).ok();
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("fail", "NOT_FOUND", msg),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("error", "DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("error", "SERIALIZATION_ERROR", "A stored record is unreadable"),
            ),
            AppError::Hashing(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("error", "HASHING_ERROR", "Password hashing error"),
            ),
            AppError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("error", "CONFIGURATION_ERROR", "Server configuration error"),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("error", "INTERNAL_ERROR", "An internal server error occurred"),
            ),
        };

        if response.0.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (response.0, Json(response.1)).into_response()
    }
}

/// Result type alias for operations that can return AppError
pub type AppResult<T> = Result<T, AppError>;
