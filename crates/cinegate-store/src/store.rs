//! Paginated catalog cache with a durable mirror.
//!
//! Three collections (movies, series, premieres), one page cursor each,
//! one shared load-more flag. Every operation absorbs its own failures
//! into the `error` field; callers only observe state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cinegate_api::omdb::DetailRecord;
use tracing::instrument;

use crate::category::Category;
use crate::source::CatalogSource;
use crate::storage::KeyValueStore;

/// Error recorded when the initial three-category load fails.
pub const INITIAL_LOAD_ERROR: &str = "Error loading data";

/// Lifecycle of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `initialize` has not run yet.
    Uninitialized,
    /// The three-category load is in flight.
    InitialLoading,
    /// Idle.
    Ready,
    /// A load-more is in flight.
    LoadingMore,
}

/// Result of a `load_more` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    /// The next page was appended.
    Appended {
        /// Number of records the page contributed.
        added: usize,
    },
    /// Another load-more was in flight; nothing happened.
    Rejected,
    /// The fetch failed; the error field was set.
    Failed,
}

#[derive(Debug)]
struct Collection {
    items: Vec<DetailRecord>,
    cursor: u32,
}

impl Default for Collection {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 1,
        }
    }
}

#[derive(Debug)]
struct StoreState {
    movies: Collection,
    series: Collection,
    premieres: Collection,
    phase: Phase,
    loading_more: bool,
    error: Option<String>,
}

impl StoreState {
    fn new() -> Self {
        Self {
            movies: Collection::default(),
            series: Collection::default(),
            premieres: Collection::default(),
            phase: Phase::Uninitialized,
            loading_more: false,
            error: None,
        }
    }

    const fn collection(&self, category: Category) -> &Collection {
        match category {
            Category::Movies => &self.movies,
            Category::Series => &self.series,
            Category::Premieres => &self.premieres,
        }
    }

    fn collection_mut(&mut self, category: Category) -> &mut Collection {
        match category {
            Category::Movies => &mut self.movies,
            Category::Series => &mut self.series,
            Category::Premieres => &mut self.premieres,
        }
    }
}

/// Clears the shared load-more flag when dropped, including when the
/// owning future is cancelled mid-fetch.
struct LoadingMoreGuard<'a> {
    state: &'a Mutex<StoreState>,
}

impl Drop for LoadingMoreGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .loading_more = false;
    }
}

/// Client-side catalog cache.
///
/// State sits behind a `std::sync::Mutex` that is never held across an
/// `.await`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogStore<S, K> {
    source: S,
    storage: K,
    state: Mutex<StoreState>,
}

impl<S, K> CatalogStore<S, K> {
    /// Creates an uninitialized store.
    pub fn new(source: S, storage: K) -> Self {
        Self {
            source,
            storage,
            state: Mutex::new(StoreState::new()),
        }
    }

    /// Returns the wrapped source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        let state = self.lock();
        if state.loading_more {
            Phase::LoadingMore
        } else {
            state.phase
        }
    }

    /// `true` until the first `initialize` has finished.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(
            self.lock().phase,
            Phase::Uninitialized | Phase::InitialLoading
        )
    }

    /// `true` while a load-more is in flight.
    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.lock().loading_more
    }

    /// Last recorded error message.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Page cursor of `category` (starts at 1).
    #[must_use]
    pub fn cursor(&self, category: Category) -> u32 {
        self.lock().collection(category).cursor
    }

    /// Copy of the records cached for `category`.
    #[must_use]
    pub fn items(&self, category: Category) -> Vec<DetailRecord> {
        self.lock().collection(category).items.clone()
    }

    /// Number of records cached for `category`.
    #[must_use]
    pub fn len(&self, category: Category) -> usize {
        self.lock().collection(category).items.len()
    }

    /// `true` when `category` holds at least one record.
    #[must_use]
    pub fn has_items(&self, category: Category) -> bool {
        self.len(category) > 0
    }
}

impl<S, K> CatalogStore<S, K>
where
    S: CatalogSource + Sync,
    K: KeyValueStore,
{
    /// Restores the durable snapshot, or fetches the first pages.
    ///
    /// The snapshot is used only when all three entries are present and
    /// readable. Otherwise the three categories are fetched concurrently
    /// at their current cursors and replace the collections only if all
    /// succeed. Every fetch is awaited to completion, even after another
    /// one fails. Always ends in `Phase::Ready`.
    #[instrument(skip_all)]
    pub async fn initialize(&self) {
        if let Some([movies, series, premieres]) = self.restore() {
            let mut state = self.lock();
            state.movies.items = movies;
            state.series.items = series;
            state.premieres.items = premieres;
            state.phase = Phase::Ready;
            tracing::info!(
                movies = state.movies.items.len(),
                series = state.series.items.len(),
                premieres = state.premieres.items.len(),
                "Restored catalog from durable storage"
            );
            return;
        }

        let (movies_page, series_page, premieres_page) = {
            let mut state = self.lock();
            state.phase = Phase::InitialLoading;
            (
                state.movies.cursor,
                state.series.cursor,
                state.premieres.cursor,
            )
        };

        let (movies, series, premieres) = futures::join!(
            self.source.fetch_page(Category::Movies, movies_page),
            self.source.fetch_page(Category::Series, series_page),
            self.source.fetch_page(Category::Premieres, premieres_page),
        );

        match (movies, series, premieres) {
            (Ok(movies), Ok(series), Ok(premieres)) => {
                self.persist(Category::Movies, &movies);
                self.persist(Category::Series, &series);
                self.persist(Category::Premieres, &premieres);

                let mut state = self.lock();
                tracing::info!(
                    movies = movies.len(),
                    series = series.len(),
                    premieres = premieres.len(),
                    "Loaded initial catalog"
                );
                state.movies.items = movies;
                state.series.items = series;
                state.premieres.items = premieres;
                state.phase = Phase::Ready;
            }
            (movies, series, premieres) => {
                let failures = [
                    (Category::Movies, movies.err()),
                    (Category::Series, series.err()),
                    (Category::Premieres, premieres.err()),
                ];
                for (category, err) in failures {
                    if let Some(err) = err {
                        tracing::error!(
                            category = %category,
                            error = %format!("{err:#}"),
                            "Error loading initial data"
                        );
                    }
                }
                let mut state = self.lock();
                state.error = Some(String::from(INITIAL_LOAD_ERROR));
                state.phase = Phase::Ready;
            }
        }
    }

    /// Fetches and appends the next page of `category`.
    ///
    /// Rejected without side effects while any load-more is in flight.
    /// The cursor advances before the fetch and stays advanced if the
    /// fetch fails.
    #[instrument(skip_all, fields(category = %category))]
    pub async fn load_more(&self, category: Category) -> LoadMoreOutcome {
        let (guard, page) = {
            let mut state = self.lock();
            if state.loading_more {
                tracing::debug!("Load-more already in flight, rejecting");
                return LoadMoreOutcome::Rejected;
            }
            state.loading_more = true;
            let collection = state.collection_mut(category);
            collection.cursor = collection.cursor.saturating_add(1);
            (
                LoadingMoreGuard { state: &self.state },
                collection.cursor,
            )
        };

        let outcome = match self.source.fetch_page(category, page).await {
            Ok(items) => {
                let added = items.len();
                let serialized = {
                    let mut state = self.lock();
                    let collection = state.collection_mut(category);
                    collection.items.extend(items);
                    serde_json::to_string(&collection.items)
                };
                self.write_entry(category, serialized);
                tracing::info!(page, added, "Appended page");
                LoadMoreOutcome::Appended { added }
            }
            Err(err) => {
                tracing::error!(page, error = %format!("{err:#}"), "Error loading more");
                self.lock().error = Some(format!("Error loading more {category}"));
                LoadMoreOutcome::Failed
            }
        };

        drop(guard);
        outcome
    }

    /// Empties every collection and its durable entry.
    ///
    /// Cursors and the error field are left as they are.
    #[instrument(skip_all)]
    pub fn clear_cache(&self) {
        for category in Category::ALL {
            if let Err(err) = self.storage.remove(category.storage_key()) {
                tracing::warn!(
                    key = category.storage_key(),
                    error = %format!("{err:#}"),
                    "Failed to remove cached entry"
                );
            }
        }

        let mut state = self.lock();
        for category in Category::ALL {
            state.collection_mut(category).items.clear();
        }
        tracing::info!("Cleared cached collections");
    }

    /// Reads all three durable entries; `None` unless every one is usable.
    fn restore(&self) -> Option<[Vec<DetailRecord>; 3]> {
        Some([
            self.read_entry(Category::Movies)?,
            self.read_entry(Category::Series)?,
            self.read_entry(Category::Premieres)?,
        ])
    }

    fn read_entry(&self, category: Category) -> Option<Vec<DetailRecord>> {
        let key = category.storage_key();
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                tracing::debug!(key, "No cached entry");
                return None;
            }
            Err(err) => {
                tracing::warn!(key, error = %format!("{err:#}"), "Failed to read cached entry");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Some(items),
            Err(err) => {
                tracing::warn!(key, error = %err, "Ignoring unreadable cached entry");
                None
            }
        }
    }

    fn persist(&self, category: Category, items: &[DetailRecord]) {
        self.write_entry(category, serde_json::to_string(items));
    }

    fn write_entry(&self, category: Category, serialized: serde_json::Result<String>) {
        let key = category.storage_key();
        let result = serialized
            .map_err(anyhow::Error::from)
            .and_then(|json| self.storage.set(key, &json));
        if let Err(err) = result {
            tracing::warn!(key, error = %format!("{err:#}"), "Failed to write cached entry");
        }
    }
}
