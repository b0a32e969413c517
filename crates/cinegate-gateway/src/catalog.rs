//! Category pipelines: search, fan-out detail calls, fan-in in search order.

use chrono::Datelike;
use cinegate_api::omdb::{DetailRecord, Kind, OmdbApi, SearchParams, SearchResults, SummaryItem};
use futures::future::try_join_all;
use tracing::instrument;

use crate::error::GatewayError;

/// Minimum search text length (Unicode scalar values).
pub const MIN_QUERY_CHARS: usize = 3;

/// Default search text for the movies list.
pub const DEFAULT_MOVIES_QUERY: &str = "movie";

/// Search text used for the series list.
const SERIES_QUERY: &str = "series";

/// Search text used for the premieres list.
const PREMIERES_QUERY: &str = "movie";

/// Rejects search text shorter than `MIN_QUERY_CHARS`.
///
/// # Errors
///
/// Returns `GatewayError::QueryTooShort` when the query is too short.
pub fn validate_query(query: &str) -> Result<(), GatewayError> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(GatewayError::QueryTooShort);
    }
    Ok(())
}

/// Parses a `page` query value, defaulting to 1 when absent.
///
/// # Errors
///
/// Returns `GatewayError::InvalidPage` unless the value is a positive integer.
pub fn parse_page(raw: Option<&str>) -> Result<u32, GatewayError> {
    let Some(raw) = raw else {
        return Ok(1);
    };
    match raw.trim().parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(GatewayError::InvalidPage(String::from(raw))),
    }
}

/// Returns the calendar year used to filter premieres.
#[must_use]
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Stateless aggregation over an OMDb API.
///
/// Every list operation is one search call followed by one detail call
/// per hit, all in flight at once. Results keep search order. Any
/// failing detail call fails the whole operation.
#[derive(Debug)]
pub struct Catalog<A> {
    /// Upstream API.
    api: A,
}

impl<A> Catalog<A> {
    /// Wraps an upstream API.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Returns the wrapped upstream API.
    pub const fn api(&self) -> &A {
        &self.api
    }
}

impl<A: OmdbApi + Sync> Catalog<A> {
    /// Lists movies matching `query` (`movie` when empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the search call or any detail call fails.
    #[instrument(skip_all, fields(query = %query, page = page))]
    pub async fn movies(&self, query: &str, page: u32) -> Result<Vec<DetailRecord>, GatewayError> {
        let query = if query.is_empty() {
            DEFAULT_MOVIES_QUERY
        } else {
            query
        };
        let params = SearchParams::new(query).kind(Kind::Movie).page(page);
        self.aggregate(&params).await
    }

    /// Fetches one full record.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail call fails.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn movie(&self, id: &str) -> Result<DetailRecord, GatewayError> {
        Ok(self.api.detail(id).await?)
    }

    /// Lists series.
    ///
    /// # Errors
    ///
    /// Returns an error if the search call or any detail call fails.
    #[instrument(skip_all, fields(page = page))]
    pub async fn series(&self, page: u32) -> Result<Vec<DetailRecord>, GatewayError> {
        let params = SearchParams::new(SERIES_QUERY)
            .kind(Kind::Series)
            .page(page);
        self.aggregate(&params).await
    }

    /// Lists movies released in `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the search call or any detail call fails.
    #[instrument(skip_all, fields(year = year, page = page))]
    pub async fn premieres(&self, year: i32, page: u32) -> Result<Vec<DetailRecord>, GatewayError> {
        let params = SearchParams::new(PREMIERES_QUERY)
            .kind(Kind::Movie)
            .year(year)
            .page(page);
        self.aggregate(&params).await
    }

    /// Searches movies and series at once.
    ///
    /// The query is validated before any upstream call. Both pipelines run
    /// concurrently and both must succeed.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::QueryTooShort` for short queries, otherwise
    /// an error if either pipeline fails.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<SearchResults, GatewayError> {
        validate_query(query)?;

        let movie_params = SearchParams::new(query).kind(Kind::Movie);
        let series_params = SearchParams::new(query).kind(Kind::Series);

        let (movies, series) = futures::try_join!(
            self.aggregate(&movie_params),
            self.aggregate(&series_params)
        )?;

        Ok(SearchResults { movies, series })
    }

    /// Search step, then fan-out/fan-in of detail calls.
    async fn aggregate(&self, params: &SearchParams) -> Result<Vec<DetailRecord>, GatewayError> {
        let page = self.api.search(params).await?;
        if page.items.is_empty() {
            tracing::debug!("Search returned no items, skipping detail calls");
            return Ok(Vec::new());
        }

        tracing::debug!(count = page.items.len(), "Fetching details");
        let requests: Vec<_> = page.items.iter().map(|item| self.detail_of(item)).collect();
        let records = try_join_all(requests).await?;

        tracing::info!(count = records.len(), "Aggregated list");
        Ok(records)
    }

    /// Detail call for one search hit.
    async fn detail_of(&self, item: &SummaryItem) -> Result<DetailRecord, GatewayError> {
        self.api
            .detail(&item.external_id)
            .await
            .map_err(|source| GatewayError::Aggregation {
                id: item.external_id.clone(),
                source,
            })
    }
}
