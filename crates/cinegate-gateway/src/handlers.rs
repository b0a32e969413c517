//! HTTP handlers for the category endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use cinegate_api::omdb::{DetailRecord, OmdbApi, SearchResults};
use serde::Deserialize;

use crate::catalog::{Catalog, current_year, parse_page};
use crate::error::GatewayError;

/// Result type of every handler.
pub type ApiResult<T> = Result<Json<T>, GatewayError>;

/// Query string of `GET /api/movies`.
///
/// Values stay raw strings so a malformed `page` reaches `parse_page`
/// and comes back as a JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct MoviesQuery {
    /// Search text, `movie` when absent.
    pub query: Option<String>,
    /// 1-based page.
    pub page: Option<String>,
}

/// Query string of the paginated category endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page.
    pub page: Option<String>,
}

/// Query string of `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text.
    pub query: Option<String>,
}

/// `GET /api/movies`
pub async fn list_movies<A>(
    State(catalog): State<Arc<Catalog<A>>>,
    Query(params): Query<MoviesQuery>,
) -> ApiResult<Vec<DetailRecord>>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let page = parse_page(params.page.as_deref())?;
    let query = params.query.unwrap_or_default();
    let records = catalog.movies(&query, page).await?;
    Ok(Json(records))
}

/// `GET /api/movies/{id}`
pub async fn get_movie<A>(
    State(catalog): State<Arc<Catalog<A>>>,
    Path(id): Path<String>,
) -> ApiResult<DetailRecord>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let record = catalog.movie(&id).await?;
    Ok(Json(record))
}

/// `GET /api/series`
pub async fn list_series<A>(
    State(catalog): State<Arc<Catalog<A>>>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Vec<DetailRecord>>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let page = parse_page(params.page.as_deref())?;
    let records = catalog.series(page).await?;
    Ok(Json(records))
}

/// `GET /api/premieres`
pub async fn list_premieres<A>(
    State(catalog): State<Arc<Catalog<A>>>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Vec<DetailRecord>>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let page = parse_page(params.page.as_deref())?;
    let records = catalog.premieres(current_year(), page).await?;
    Ok(Json(records))
}

/// `GET /api/search`
pub async fn search<A>(
    State(catalog): State<Arc<Catalog<A>>>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResults>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let query = params.query.unwrap_or_default();
    let results = catalog.search(&query).await?;
    Ok(Json(results))
}
