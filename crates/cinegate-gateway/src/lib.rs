//! Aggregation gateway for the OMDb catalog.
//!
//! Exposes category list endpoints (`/api/movies`, `/api/series`,
//! `/api/premieres`, `/api/search`) that run one OMDb search, fan out one
//! detail call per hit, and return the full records in search order.

/// Category pipelines.
pub mod catalog;
/// Process configuration.
pub mod config;
/// Error taxonomy and HTTP mapping.
pub mod error;
/// HTTP handlers.
pub mod handlers;
/// Route table.
pub mod router;

use std::sync::Arc;

use anyhow::{Context, Result};
use cinegate_api::omdb::OmdbClient;
use tokio::net::TcpListener;

pub use catalog::Catalog;
pub use config::GatewayConfig;
pub use error::{ErrorBody, GatewayError};
pub use router::create_router;

/// Builds the OMDb client described by `config`.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed.
pub fn build_client(config: &GatewayConfig, user_agent: &str) -> Result<OmdbClient> {
    let mut builder = OmdbClient::builder()
        .api_key(config.api_key.clone())
        .user_agent(user_agent);
    if let Some(url) = &config.omdb_base_url {
        builder = builder.base_url(url.clone());
    }
    builder.build()
}

/// Binds `config.listen_addr()` and serves the gateway until the process exits.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the port cannot be
/// bound, or the server stops with an I/O error.
pub async fn serve(config: &GatewayConfig, user_agent: &str) -> Result<()> {
    let client = build_client(config, user_agent)?;
    let app = create_router(Arc::new(Catalog::new(client)));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Gateway listening");

    axum::serve(listener, app)
        .await
        .context("gateway server stopped")?;
    Ok(())
}
