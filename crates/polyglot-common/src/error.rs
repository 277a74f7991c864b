//! Centralized error types for Polyglot.
//!
//! Every handler returns [`PolyglotResult`]; the status mapping below is the single
//! place where a failure kind becomes an HTTP status and JSON envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// One field-level validation failure, rendered as `{code, message}`.
///
/// `code` is the offending field name (`email`, `short_code`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Core application error type used across all Polyglot services.
#[derive(Debug, thiserror::Error)]
pub enum PolyglotError {
    // === Auth errors ===
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Unauthenticated.")]
    Unauthenticated,

    // === Resource errors ===
    #[error("{resource} not found.")]
    NotFound { resource: String },

    #[error("{message}")]
    Conflict { message: String },

    // === Validation errors ===
    #[error("Validation Error")]
    Validation { errors: Vec<FieldError> },

    // === Infrastructure errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl PolyglotError {
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
        }
    }

    /// A validation failure carrying a single field error.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Validation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for PolyglotError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.error_code();

        // Don't leak internal details to clients
        let (message, errors) = match self {
            PolyglotError::Database(e) => {
                tracing::error!("Database error: {e}");
                ("An internal error occurred".to_string(), Vec::new())
            }
            PolyglotError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                ("An internal error occurred".to_string(), Vec::new())
            }
            PolyglotError::Validation { errors } => ("Validation Error".to_string(), errors),
            PolyglotError::InvalidCredentials => {
                let message = PolyglotError::InvalidCredentials.to_string();
                let errors = vec![FieldError::new("email", message.clone())];
                (message, errors)
            }
            other => (other.to_string(), Vec::new()),
        };

        let body = ErrorResponse {
            success: false,
            error,
            message,
            errors,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results using PolyglotError.
pub type PolyglotResult<T> = Result<T, PolyglotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table() {
        assert_eq!(
            PolyglotError::invalid("key", "The key field is required.").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            PolyglotError::InvalidCredentials.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            PolyglotError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PolyglotError::not_found("Locale").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PolyglotError::Conflict {
                message: "taken".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            PolyglotError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_resource() {
        assert_eq!(
            PolyglotError::not_found("Translation").to_string(),
            "Translation not found."
        );
    }
}
