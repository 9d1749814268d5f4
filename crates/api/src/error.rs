//! API error types with HTTP response mapping.
//!
//! Client errors are answered with a plain-text `error: <message>` body.
//! Infrastructure failures are logged and answered with a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource looked up directly by the client does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Malformed request (path, query or body).
    #[error("{0}")]
    BadRequest(String),

    /// Error raised by a domain service.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                tracing::debug!(%msg, "resource not found");
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::BadRequest(msg) => client_error(msg),
            ApiError::Domain(err) if err.is_client_error() => client_error(err.to_string()),
            ApiError::Domain(err) => {
                tracing::error!(error = %err, "internal server error");
                metrics::counter!("http_internal_errors_total").increment(1);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

fn client_error(message: String) -> Response {
    metrics::counter!("http_client_errors_total").increment(1);
    (StatusCode::BAD_REQUEST, format!("error: {message}")).into_response()
}
