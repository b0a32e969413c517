//! Client-side catalog cache for the cinegate gateway.
//!
//! `CatalogStore` keeps three paginated collections (movies, series,
//! premieres) mirrored to a `KeyValueStore`, fed by a `CatalogSource`
//! such as `GatewayClient`.

/// Browsable categories.
pub mod category;
/// Gateway HTTP client.
pub mod client;
/// Search-as-you-type debouncing.
pub mod debounce;
/// Search result helpers.
pub mod search;
mod source;
/// Durable key-value storage.
pub mod storage;
/// The catalog store.
pub mod store;

pub use category::Category;
pub use client::{GatewayClient, GatewayClientBuilder};
pub use debounce::Debouncer;
pub use source::{CatalogSource, LocalCatalogSource};
pub use storage::{KeyValueStore, MemoryStorage, SqliteStorage};
pub use store::{CatalogStore, LoadMoreOutcome, Phase};
