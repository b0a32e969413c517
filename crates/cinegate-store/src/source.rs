//! `CatalogSource` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use cinegate_api::omdb::DetailRecord;

use crate::category::Category;

/// Page-at-a-time supplier of catalog records.
///
/// Implemented by `GatewayClient` and by fakes in tests.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogSource: Send)]
pub trait LocalCatalogSource {
    /// Fetches one page (1-based) of `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    async fn fetch_page(&self, category: Category, page: u32) -> Result<Vec<DetailRecord>>;
}
