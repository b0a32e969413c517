//! OMDb client error type.

use thiserror::Error;

/// Failure of a single OMDb call.
///
/// Transport-level and provider-level failures are collapsed into this
/// one type so that callers only handle a single error shape.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum OmdbError {
    /// Non-success HTTP status from the provider.
    #[error("OMDb API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, or the canonical reason when the body is empty.
        message: String,
    },

    /// The provider answered but flagged a logical failure (`Response: False`).
    #[error("{message}")]
    Provider {
        /// Provider's `Error` field (e.g. `Movie not found!`).
        message: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("OMDb request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The payload was not the JSON shape we expected.
    #[error("failed to decode OMDb response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request URL could not be built.
    #[error("invalid OMDb request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl OmdbError {
    /// Returns `true` when the provider itself rejected the request.
    #[must_use]
    pub const fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
