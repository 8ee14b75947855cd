//! Error types for Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure with a single message
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NotFound",
            AppError::Validation(_) => "Validation",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(validation_messages(&errors))
    }
}

/// Flatten validator output into readable messages, sorted by field name
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut messages = Vec::new();
    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    match &err.message {
                        Some(msg) => messages.push(msg.to_string()),
                        None => messages.push(format!("{} is invalid ({})", field, err.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                messages.extend(validation_messages(nested));
            }
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    messages.extend(validation_messages(nested));
                }
            }
        }
    }
    messages
}

/// Error message: plain text, or a list for validation failures
#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    List(Vec<String>),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: ErrorMessage,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorMessage::Text(msg)),
            AppError::Validation(msgs) => (StatusCode::BAD_REQUEST, ErrorMessage::List(msgs)),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorMessage::Text("Database error".to_string()),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorMessage::Text("Internal server error".to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            status: status.as_u16(),
            error: kind.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
