//! Gateway error taxonomy and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinegate_api::omdb::OmdbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a gateway operation.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum GatewayError {
    /// Search text below `MIN_QUERY_CHARS`. Never reaches upstream.
    #[error("Query must have at least 3 characters")]
    QueryTooShort,

    /// `page` was not a positive integer. Never reaches upstream.
    #[error("Invalid page: {0:?}")]
    InvalidPage(String),

    /// A single upstream call (search or detail) failed.
    #[error(transparent)]
    Upstream(#[from] OmdbError),

    /// One detail call inside a fan-out failed; the whole list is dropped.
    #[error("{source}")]
    Aggregation {
        /// IMDb ID whose detail call failed.
        id: String,
        /// Underlying upstream failure.
        #[source]
        source: OmdbError,
    },
}

impl GatewayError {
    /// Returns `true` for input validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::QueryTooShort | Self::InvalidPage(_))
    }

    /// HTTP status for this error: 400 for validation, 500 for the rest.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// JSON body of every failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct ErrorBody {
    /// Human-readable message of the originating error.
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            match &self {
                Self::Aggregation { id, source } => {
                    tracing::error!(%id, error = %source, "Fan-out failed, dropping aggregated list");
                }
                other => tracing::error!(error = %other, "Upstream request failed"),
            }
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }

        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_400() {
        // Arrange & Act & Assert
        assert_eq!(
            GatewayError::QueryTooShort.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::InvalidPage(String::from("0")).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_errors_map_to_500() {
        // Arrange
        let provider = GatewayError::from(OmdbError::Provider {
            message: String::from("Movie not found!"),
        });
        let status = GatewayError::from(OmdbError::Status {
            status: 401,
            message: String::from("Invalid API key!"),
        });

        // Act & Assert
        assert_eq!(provider.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_aggregation_carries_originating_message() {
        // Arrange
        let err = GatewayError::Aggregation {
            id: String::from("tt0000000"),
            source: OmdbError::Provider {
                message: String::from("Incorrect IMDb ID."),
            },
        };

        // Act & Assert
        assert_eq!(err.to_string(), "Incorrect IMDb ID.");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_query_too_short_message() {
        // Arrange & Act & Assert
        assert_eq!(
            GatewayError::QueryTooShort.to_string(),
            "Query must have at least 3 characters"
        );
    }
}
