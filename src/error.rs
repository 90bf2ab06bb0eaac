//! Sweep error types with HTTP status code mapping.
//!
//! [`SweepError`] is the central error type for the engine. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventId, SubmissionId, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1401,
///     "message": "unauthorized: missing bearer credential",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Engine error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1400–1499 | Authorization   | 401 Unauthorized          |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The administrative call carried no valid credential.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// Profile for the given user was not found.
    #[error("profile not found: {0}")]
    ProfileNotFound(UserId),

    /// Submission with the given ID was not found.
    #[error("submission not found: {0}")]
    SubmissionNotFound(SubmissionId),

    /// Storage read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row could not be decoded into a domain record.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SweepError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Unauthorized(_) => 1401,
            Self::EventNotFound(_) => 2001,
            Self::ProfileNotFound(_) => 2002,
            Self::SubmissionNotFound(_) => 2003,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::InvalidRecord(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::EventNotFound(_) | Self::ProfileNotFound(_) | Self::SubmissionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Storage(_) | Self::InvalidRecord(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for SweepError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl IntoResponse for SweepError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
