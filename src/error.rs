//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Every
//! variant surfaces to clients as a generic 500 with the message embedded;
//! callers cannot tell a constraint violation from lost connectivity.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "detail": "Database query failed: relation \"employees\" does not exist"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub detail: String,
}

/// Server-side error enum.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The pool could not be established or the store is unreachable.
    #[error("connection to PostgreSQL failed: {0}")]
    Connection(String),

    /// No pool is available (startup failed or the pool was closed).
    #[error("Database connection not available")]
    Unavailable,

    /// Statement execution failed in the driver.
    #[error("Database query failed: {0}")]
    Query(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    ///
    /// Store failures are never distinguished for clients, so every
    /// variant maps to 500.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Connection(_) | Self::Unavailable | Self::Query(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => Self::Unavailable,
            other => Self::Query(other.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_is_internal_server_error() {
        let errors = [
            GatewayError::Connection("refused".to_string()),
            GatewayError::Unavailable,
            GatewayError::Query("syntax error".to_string()),
            GatewayError::Internal("boom".to_string()),
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn query_error_embeds_driver_message() {
        let err = GatewayError::Query("duplicate key value".to_string());
        assert_eq!(err.to_string(), "Database query failed: duplicate key value");
    }

    #[test]
    fn closed_pool_maps_to_unavailable() {
        let err = GatewayError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, GatewayError::Unavailable));
    }

    #[test]
    fn acquire_timeout_maps_to_query_error() {
        let err = GatewayError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, GatewayError::Query(_)));
    }
}
