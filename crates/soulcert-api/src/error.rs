//! # API Error Types
//!
//! [`AppError`] maps domain errors to HTTP status codes and structured
//! JSON bodies. Internal messages are logged for operators and never
//! returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use soulcert_registry::{AdminError, IssueError, RevokeError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable code (e.g. "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Application-level error type implementing [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request was missing or carried unusable fields (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failed (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict with existing state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal failure (500). Message logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error details to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<IssueError> for AppError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::Validation(e) => Self::BadRequest(e.to_string()),
            IssueError::Canonicalization(e) => Self::BadRequest(e.to_string()),
            IssueError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<RevokeError> for AppError {
    fn from(err: RevokeError) -> Self {
        match err {
            RevokeError::Validation(e) => Self::BadRequest(e.to_string()),
            RevokeError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match &err {
            AdminError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AdminError::AlreadyExists(_) => Self::Conflict(err.to_string()),
            AdminError::NotFound(_) => Self::NotFound(err.to_string()),
            AdminError::SelfRemoval => Self::BadRequest(err.to_string()),
            AdminError::Validation(_) => Self::BadRequest(err.to_string()),
            AdminError::Read { .. } | AdminError::Malformed { .. } | AdminError::Write { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}
