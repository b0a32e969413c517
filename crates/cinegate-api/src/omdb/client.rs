//! `OmdbClient` - OMDb API client implementation.

use std::fmt;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::OmdbApi;
use super::error::OmdbError;
use super::types::{DetailRecord, OmdbSearchResponse, OmdbStatus, SearchPage, SearchParams};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb API client.
///
/// Every call issues exactly one outbound request. There is no retry and
/// no rate limiting here; callers own that policy.
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key, sent as the `apikey` query parameter.
    api_key: String,
}

impl fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key and decodes the payload.
    ///
    /// Non-success statuses become `OmdbError::Status`; a success status
    /// whose payload says `"Response": "False"` becomes
    /// `OmdbError::Provider`.
    #[instrument(skip_all)]
    async fn get_json<T: DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T, OmdbError> {
        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .build()?;

        tracing::debug!(params = ?query, "OMDb API request");

        let response = self.http_client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OmdbStatus>(&body)
                .ok()
                .and_then(|s| s.failure())
                .unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        String::from(status.canonical_reason().unwrap_or("unknown status"))
                    } else {
                        body
                    }
                });
            tracing::warn!(status = status.as_u16(), %message, "OMDb API returned an error status");
            return Err(OmdbError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let provider_status: OmdbStatus = serde_json::from_str(&body)?;
        if let Some(message) = provider_status.failure() {
            tracing::debug!(%message, "OMDb API reported a failure");
            return Err(OmdbError::Provider { message });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl OmdbApi for OmdbClient {
    #[instrument(skip_all, fields(query = %params.query, page = ?params.page))]
    async fn search(&self, params: &SearchParams) -> Result<SearchPage, OmdbError> {
        let raw: OmdbSearchResponse = self.get_json(&params.to_query()).await?;
        Ok(SearchPage::from(raw))
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn detail(&self, id: &str) -> Result<DetailRecord, OmdbError> {
        let query = [("i", String::from(id))];
        self.get_json(&query).await
    }
}
