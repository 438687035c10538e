//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use logtide_core::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for server operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while serving requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was not valid JSON for the expected shape.
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    /// A required body field was absent or empty.
    #[error("Missing fields in payload: {0}")]
    MissingFields(String),

    /// A required query parameter was absent or empty.
    #[error("Missing query parameters: service, start, and end are required")]
    MissingQueryParams,

    /// The query string could not be decoded.
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    /// A timestamp could not be parsed as ISO-8601.
    #[error("Invalid timestamp format for {field}: {value:?}. Use ISO 8601 format.")]
    InvalidTimestamp {
        /// Which field carried the bad value.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failed to bind to the listen address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidJson(_) => (StatusCode::BAD_REQUEST, "invalid_json"),
            Self::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
            Self::MissingFields(_) | Self::MissingQueryParams => {
                (StatusCode::BAD_REQUEST, "missing_fields")
            }
            Self::InvalidTimestamp { .. } => (StatusCode::BAD_REQUEST, "invalid_timestamp"),
            Self::Store(StoreError::InvalidRange { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_range")
            }
            Self::Store(StoreError::EmptyServiceName) => {
                (StatusCode::BAD_REQUEST, "missing_fields")
            }
            Self::Store(_) | Self::BindFailed(_, _) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: kind,
            message: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn client_errors_map_to_bad_request() {
        let start = Utc.with_ymd_and_hms(2025, 3, 17, 11, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 17, 10, 0, 0).unwrap();

        let errors = vec![
            ApiError::InvalidJson("eof".to_string()),
            ApiError::MissingFields("message".to_string()),
            ApiError::MissingQueryParams,
            ApiError::InvalidQuery("duplicate field `service`".to_string()),
            ApiError::InvalidTimestamp {
                field: "start",
                value: "yesterday".to_string(),
            },
            ApiError::Store(StoreError::InvalidRange { start, end }),
            ApiError::Store(StoreError::EmptyServiceName),
        ];

        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn server_errors_map_to_internal() {
        let err = ApiError::Store(StoreError::ExpireFailed("boom".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::Internal("boom".to_string());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_display() {
        let err = ApiError::InvalidTimestamp {
            field: "timestamp",
            value: "soon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp format for timestamp: \"soon\". Use ISO 8601 format."
        );

        let err = ApiError::from(StoreError::EmptyServiceName);
        assert_eq!(err.to_string(), "service name cannot be empty");
    }
}
