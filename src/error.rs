use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error;
use std::fmt;

use crate::fundmeta::CoreError;
use crate::pagination::PaginationError;
use crate::validate::FieldError;

/// The HTTP-facing error type.
///
/// Every handler returns `AppResult`; an `Err` renders its own response through
/// [`IntoResponse`], so the router never writes a default error body.
#[derive(Debug)]
pub enum AppError {
    /// For anything unexpected, including a missing request context.
    Internal(anyhow::Error),
    /// For malformed requests: undecodable bodies or query strings.
    BadRequest(String),
    /// For when a requested resource is not found.
    NotFound(String),
    /// For uniqueness violations.
    Conflict(String),
    /// For unclassified persistence failures.
    Database(String),
    /// For identifiers that are not positive 32-bit integers.
    InvalidId,
    /// For payloads with one or more invalid fields.
    ValidationError(Vec<FieldError>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::InvalidId => write!(f, "ID is not in its proper form"),
            AppError::ValidationError(fields) => write!(f, "Validation failed for {} field(s)", fields.len()),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(error_id = %error_id, "Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    Some(json!({ "details": msg })),
                )
            }
            AppError::InvalidId => {
                (StatusCode::BAD_REQUEST, "INVALID_ID", "ID is not in its proper form".to_string(), None)
            }
            AppError::ValidationError(fields) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "One or more fields failed validation".to_string(),
                Some(json!({ "fields": fields })),
            ),
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["error"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(fields) => AppError::ValidationError(fields.into_vec()),
            CoreError::InvalidId => AppError::InvalidId,
            CoreError::NotFound => AppError::NotFound("mutual_fund_meta not found".to_string()),
            // Fixed text: driver messages for constraint failures are not exposed
            CoreError::DuplicateEntry => {
                AppError::Conflict("a mutual_fund_meta with this scheme_code already exists".to_string())
            }
            other @ CoreError::Store { .. } => AppError::Database(other.to_string()),
        }
    }
}

impl From<PaginationError> for AppError {
    fn from(err: PaginationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
