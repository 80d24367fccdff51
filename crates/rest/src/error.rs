//! Error types for the search API.
//!
//! Errors render as `{ "error": "<message>" }`.
//!
//! | Error | HTTP Status | Message |
//! |-------|-------------|---------|
//! | MalformedFilter | 400 | `Request contained invalid payload: ...` |
//! | ValidationRejected | 400 | `Request contained invalid payload: <fields>` |
//! | Backend | 500 | fixed database message |
//! | Config / Unknown | 500 | fixed server-side message |
//!
//! Database detail is logged by the executor and never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use searchbox_persistence::error::{SearchboxError, ValidationIssue};
use thiserror::Error;
use tracing::error;

/// Message returned for database failures.
pub const DATABASE_ERROR_MESSAGE: &str = "Request caused a database error";

/// Message returned for any other server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Request caused an error";

/// The error type for REST API operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// The payload or one of its requests is invalid (HTTP 400).
    #[error("Request contained invalid payload: {details}")]
    InvalidPayload {
        /// Offending fields or filter token.
        details: String,
    },

    /// The database failed (HTTP 500).
    #[error("Request caused a database error")]
    Database,

    /// Anything else (HTTP 500).
    #[error("Request caused an error")]
    Internal,

    /// The backend is not reachable (HTTP 503).
    #[error("Service unavailable")]
    Unavailable,
}

impl RestError {
    /// Creates an invalid-payload error naming `details`.
    pub fn invalid_payload(details: impl Into<String>) -> Self {
        RestError::InvalidPayload {
            details: details.into(),
        }
    }

    /// The HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            RestError::Database | RestError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<SearchboxError> for RestError {
    fn from(err: SearchboxError) -> Self {
        match err {
            SearchboxError::MalformedFilter { token, .. } => {
                RestError::invalid_payload(format!("malformed filter '{token}'"))
            }
            SearchboxError::ValidationRejected { issues } => {
                RestError::invalid_payload(ValidationIssue::fields(&issues))
            }
            SearchboxError::Backend(_) => RestError::Database,
            other => {
                error!(error = %other, "search request failed");
                RestError::Internal
            }
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;
