//! Route table.

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use cinegate_api::omdb::OmdbApi;

use crate::catalog::Catalog;
use crate::handlers;

/// Builds the gateway router over a shared catalog.
pub fn create_router<A>(catalog: Arc<Catalog<A>>) -> Router
where
    A: OmdbApi + Send + Sync + 'static,
{
    Router::new()
        .route("/api/movies", get(handlers::list_movies::<A>))
        .route("/api/movies/{id}", get(handlers::get_movie::<A>))
        .route("/api/series", get(handlers::list_series::<A>))
        .route("/api/premieres", get(handlers::list_premieres::<A>))
        .route("/api/search", get(handlers::search::<A>))
        .layer(middleware::from_fn(allow_any_origin))
        .with_state(catalog)
}

/// Methods advertised to CORS preflight requests.
const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Permissive CORS on every response. Preflight `OPTIONS` requests are
/// answered with 204 without reaching a handler.
async fn allow_any_origin(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    response
}
