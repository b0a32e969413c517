//! `GatewayClient` - HTTP client for the cinegate gateway.

use anyhow::{Context, Result, anyhow, bail, ensure};
use cinegate_api::omdb::{DetailRecord, SearchResults};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::category::Category;
use crate::source::CatalogSource;

/// Gateway address when none is configured.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3000/";

/// Minimum search length accepted before any request is sent.
pub const MIN_SEARCH_CHARS: usize = 3;

/// Failure body returned by the gateway.
#[derive(Debug, Deserialize)]
struct GatewayFailure {
    message: String,
}

/// Client for the gateway's JSON endpoints.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct GatewayClient {
    /// HTTP client.
    http_client: Client,
    /// Gateway root, always ending in `/`.
    base_url: Url,
}

/// Builder for `GatewayClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct GatewayClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
}

impl GatewayClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
        }
    }

    /// Overrides the gateway URL.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
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
    /// - `user_agent` is not set.
    /// - the base URL cannot carry a path.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<GatewayClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let mut base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_GATEWAY_URL).context("invalid default gateway URL")?,
        };
        ensure!(
            !base_url.cannot_be_a_base(),
            "gateway URL cannot be a base: {base_url}"
        );
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(GatewayClient {
            http_client,
            base_url,
        })
    }
}

/// Trims `raw` and returns it when long enough to search for.
#[must_use]
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (trimmed.chars().count() >= MIN_SEARCH_CHARS).then_some(trimmed)
}

impl GatewayClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> GatewayClientBuilder {
        GatewayClientBuilder::new()
    }

    /// Gateway root URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Unified search over movies and series.
    ///
    /// # Errors
    ///
    /// Fails without a request when the trimmed query is shorter than
    /// three characters; otherwise on any transport or gateway failure.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let Some(query) = normalize_query(query) else {
            bail!("Only queries with at least {MIN_SEARCH_CHARS} characters.");
        };
        let url = self.endpoint(&["api", "search"])?;
        self.get_json(url, &[("query", String::from(query))]).await
    }

    /// Full record for one IMDb ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is empty or the request fails.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn movie_details(&self, id: &str) -> Result<DetailRecord> {
        ensure!(!id.trim().is_empty(), "Movie ID is required.");
        let url = self.endpoint(&["api", "movies", id.trim()])?;
        self.get_json(url, &[]).await
    }

    /// Appends path segments to the gateway root.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("gateway URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON payload.
    ///
    /// Non-success responses become an error carrying the gateway's
    /// `message` when present.
    #[instrument(skip_all, fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .context("gateway request failed")?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GatewayFailure>(&body)
                .map(|f| f.message)
                .unwrap_or_else(|_| format!("gateway returned HTTP {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), %message, "Gateway returned an error status");
            bail!(message);
        }

        response
            .json::<T>()
            .await
            .context("failed to decode gateway response")
    }
}

impl CatalogSource for GatewayClient {
    #[instrument(skip_all, fields(category = %category, page = page))]
    async fn fetch_page(&self, category: Category, page: u32) -> Result<Vec<DetailRecord>> {
        let url = self.endpoint(&category.api_segments())?;
        self.get_json(url, &[("page", page.to_string())]).await
    }
}
