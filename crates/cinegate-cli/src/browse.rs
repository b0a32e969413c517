//! Line-oriented browsing session over a `CatalogStore`.

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use cinegate_api::omdb::DetailRecord;
use cinegate_store::{CatalogSource, CatalogStore, Category, KeyValueStore, LoadMoreOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One command typed at the `browse` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    /// `more <category>`: load the next page.
    More(Category),
    /// `list <category>`: show cached records.
    List(Category),
    /// `clear`: drop cached collections.
    Clear,
    /// `status`: show counts, cursors and the last error.
    Status,
    /// `quit`: end the session.
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next();
        if words.next().is_some() {
            bail!("too many arguments: {s}");
        }

        match (command, argument) {
            ("more", Some(category)) => Ok(Self::More(category.parse()?)),
            ("list", Some(category)) => Ok(Self::List(category.parse()?)),
            ("more" | "list", None) => bail!("{command} needs a category (movies, series, premieres)"),
            ("clear", None) => Ok(Self::Clear),
            ("status", None) => Ok(Self::Status),
            ("quit" | "exit", None) => Ok(Self::Quit),
            _ => bail!("unknown command: {s} (try more, list, clear, status, quit)"),
        }
    }
}

/// One-line description of a record.
pub fn describe(record: &DetailRecord) -> String {
    let year = record.year.as_deref().unwrap_or("N/A");
    format!("{}  {} ({year})", record.external_id, record.title)
}

/// Provider attributes listed by `details`, in display order.
const DETAIL_FIELDS: [&str; 7] = [
    "Genre",
    "Runtime",
    "Director",
    "Actors",
    "imdbRating",
    "Released",
    "Plot",
];

/// Multi-line description of one full record. Absent and `N/A` values
/// are skipped.
pub fn describe_details(record: &DetailRecord) -> Vec<String> {
    let mut lines = vec![describe(record)];
    if let Some(kind) = &record.kind {
        lines.push(format!("{:<11}{kind}", "Type"));
    }
    for field in DETAIL_FIELDS {
        if let Some(value) = record.attribute(field).filter(|v| *v != "N/A") {
            lines.push(format!("{field:<11}{value}"));
        }
    }
    if let Some(poster) = record.poster_url.as_deref().filter(|p| *p != "N/A") {
        lines.push(format!("{:<11}{poster}", "Poster"));
    }
    lines
}

/// Reads commands from `input` until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if `input` cannot be read.
pub async fn run_session<S, K, R>(store: &CatalogStore<S, K>, input: R) -> Result<()>
where
    S: CatalogSource + Sync,
    K: KeyValueStore,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<BrowseCommand>() {
            Ok(BrowseCommand::Quit) => break,
            Ok(command) => execute(store, command).await,
            Err(err) => tracing::warn!("{err}"),
        }
    }
    Ok(())
}

async fn execute<S, K>(store: &CatalogStore<S, K>, command: BrowseCommand)
where
    S: CatalogSource + Sync,
    K: KeyValueStore,
{
    match command {
        BrowseCommand::More(category) => match store.load_more(category).await {
            LoadMoreOutcome::Appended { added } => tracing::info!(
                "Loaded {added} more {category} (page {}, {} total)",
                store.cursor(category),
                store.len(category)
            ),
            LoadMoreOutcome::Rejected => tracing::warn!("Another load is already in progress"),
            LoadMoreOutcome::Failed => {
                tracing::error!("{}", store.error().unwrap_or_default());
            }
        },
        BrowseCommand::List(category) => {
            let items = store.items(category);
            if items.is_empty() {
                tracing::info!("No cached {category}");
            }
            for (position, record) in (1_u32..).zip(&items) {
                tracing::info!("{position:>3}. {}", describe(record));
            }
        }
        BrowseCommand::Clear => {
            store.clear_cache();
            tracing::info!("Cache cleared");
        }
        BrowseCommand::Status => print_status(store),
        BrowseCommand::Quit => {}
    }
}

/// Logs counts and cursors for every category, then the last error.
pub fn print_status<S, K>(store: &CatalogStore<S, K>) {
    for category in Category::ALL {
        tracing::info!(
            "{:<10} {:>4} items  page {}",
            category.as_str(),
            store.len(category),
            store.cursor(category)
        );
    }
    if let Some(error) = store.error() {
        tracing::warn!("Last error: {error}");
    }
}
