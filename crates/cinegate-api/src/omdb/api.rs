//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::OmdbError;
use super::types::{DetailRecord, SearchPage, SearchParams};

/// OMDb API trait.
///
/// Abstracts the two provider calls for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches the catalog (`?s=`), one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the provider reports a
    /// failure (including "not found"), or the payload cannot be decoded.
    async fn search(&self, params: &SearchParams) -> Result<SearchPage, OmdbError>;

    /// Fetches one full record by IMDb ID (`?i=`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the provider reports a
    /// failure, or the payload cannot be decoded.
    async fn detail(&self, id: &str) -> Result<DetailRecord, OmdbError>;
}
