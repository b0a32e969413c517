//! cinegate - movie and series catalog over OMDb.

/// Interactive browsing session.
mod browse;
/// Application configuration (TOML).
mod config;
/// Config and database locations.
mod paths;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cinegate_gateway::GatewayConfig;
use cinegate_store::client::{MIN_SEARCH_CHARS, normalize_query};
use cinegate_store::debounce::SEARCH_DEBOUNCE;
use cinegate_store::search::{SUGGESTION_LIMIT, latest_first};
use cinegate_store::{CatalogStore, Debouncer, GatewayClient, SqliteStorage};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::browse::{describe, describe_details, print_status, run_session};
use crate::config::AppConfig;
use crate::paths::AppPaths;

/// User-Agent sent upstream and to the gateway.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the aggregation gateway (reads MOVIES_API_KEY, PORT, OMDB_BASE_URL).
    Serve(ServeArgs),
    /// Browse movies, series and premieres through the local cache.
    Browse,
    /// Search movies and series.
    Search(SearchArgs),
    /// Show the full record for one IMDb ID.
    Details(DetailsArgs),
}

/// Arguments for the `serve` subcommand.
#[derive(clap::Args)]
struct ServeArgs {
    /// Listen port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search text (at least 3 characters).
    #[arg(required_unless_present = "interactive", conflicts_with = "interactive")]
    query: Option<String>,

    /// Read queries from stdin and search once typing settles.
    #[arg(long, short)]
    interactive: bool,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb ID (e.g. `tt0372784`).
    id: String,
}

/// Runs the `serve` subcommand.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or the server fails.
#[instrument(skip_all)]
async fn run_serve(args: &ServeArgs) -> Result<()> {
    dotenvy::dotenv().ok();

    let mut config = GatewayConfig::from_env()?;
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    tracing::info!(?config, "Starting gateway");

    cinegate_gateway::serve(&config, USER_AGENT).await
}

/// Builds the gateway client from `config.toml`.
fn build_gateway_client(paths: &AppPaths) -> Result<GatewayClient> {
    let config = AppConfig::load(&paths.config_file).context("failed to load config")?;

    GatewayClient::builder()
        .base_url(config.browse.gateway_url()?)
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build gateway client")
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client or cache database cannot be set up, or
/// stdin cannot be read.
#[instrument(skip_all)]
async fn run_browse(paths: &AppPaths) -> Result<()> {
    let client = build_gateway_client(paths)?;
    let storage = SqliteStorage::open(&paths.database_file)?;
    let store = CatalogStore::new(client, storage);

    store.initialize().await;
    print_status(&store);
    tracing::info!("Commands: more <category>, list <category>, clear, status, quit");

    run_session(&store, BufReader::new(tokio::io::stdin())).await
}

/// Searches and logs the most recent movie hits.
async fn search_and_print(client: &GatewayClient, query: &str) -> Result<()> {
    let results = client
        .search(query)
        .await
        .context("Failed to fetch movies. Please try again.")?;

    let top = latest_first(results.movies, SUGGESTION_LIMIT);
    if top.is_empty() {
        tracing::info!("No results found for \"{query}\"");
        return Ok(());
    }
    for record in &top {
        tracing::info!("{}", describe(record));
    }
    Ok(())
}

/// Runs the one-shot `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is too short or the search fails.
#[instrument(skip_all)]
async fn run_search(query: &str, paths: &AppPaths) -> Result<()> {
    let Some(query) = normalize_query(query) else {
        bail!("Only queries with at least {MIN_SEARCH_CHARS} characters.");
    };
    let client = build_gateway_client(paths)?;
    search_and_print(&client, query).await
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the ID is empty or the record cannot be fetched.
#[instrument(skip_all)]
async fn run_details(id: &str, paths: &AppPaths) -> Result<()> {
    let client = build_gateway_client(paths)?;
    let record = client
        .movie_details(id)
        .await
        .context("Failed to fetch movie details.")?;
    for line in describe_details(&record) {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs `search --interactive`: every stdin line replaces the pending
/// query and only the settled one is searched.
///
/// # Errors
///
/// Returns an error if the client cannot be built or stdin cannot be read.
#[instrument(skip_all)]
async fn run_interactive_search(paths: &AppPaths) -> Result<()> {
    let client = build_gateway_client(paths)?;
    let debouncer = Debouncer::new(SEARCH_DEBOUNCE, move |query: String| {
        let client = client.clone();
        async move {
            if let Err(err) = search_and_print(&client, &query).await {
                tracing::error!("{err:#}");
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match normalize_query(&line) {
            Some(query) => debouncer.push(String::from(query))?,
            None => tracing::info!("Type at least {MIN_SEARCH_CHARS} characters to search"),
        }
    }

    debouncer.finish().await
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let paths = || AppPaths::resolve(cli.dir.as_deref()).context("failed to resolve file locations");
    match cli.command {
        Commands::Serve(args) => run_serve(&args).await,
        Commands::Browse => run_browse(&paths()?).await,
        Commands::Search(args) => match (args.interactive, args.query) {
            (true, _) => run_interactive_search(&paths()?).await,
            (false, Some(query)) => run_search(&query, &paths()?).await,
            (false, None) => bail!("a search query is required"),
        },
        Commands::Details(args) => run_details(&args.id, &paths()?).await,
    }
}
