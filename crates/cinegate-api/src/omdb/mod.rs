//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint: `?s=` for paged search
//! and `?i=` for a single full record.

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::OmdbError;
pub use types::{DetailRecord, Kind, SearchPage, SearchParams, SearchResults, SummaryItem};
