//! OMDb response types, catalog records and search parameters.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// --- Kind ---

/// Catalog entry kind as reported by the provider's `Type` field.
///
/// Values other than `movie` and `series` are kept verbatim so that a
/// record serializes back to exactly what the provider sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Kind {
    /// A feature film.
    Movie,
    /// A TV series.
    Series,
    /// Anything else (`episode`, `game`, ...).
    Other(String),
}

impl Kind {
    /// Returns the provider's wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for Kind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            _ => Self::Other(value),
        }
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Movie => Self::from("movie"),
            Kind::Series => Self::from("series"),
            Kind::Other(other) => other,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Search ---

/// A single search hit from `?s=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    /// IMDb ID (e.g. `tt0372784`).
    #[serde(rename = "imdbID")]
    pub external_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year or year range (e.g. `2005`, `2008–2013`).
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Entry kind.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    /// Poster URL, or `N/A`.
    #[serde(rename = "Poster", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

/// One page of search hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Hits in provider order.
    pub items: Vec<SummaryItem>,
    /// Total number of hits across all pages (0 when absent).
    pub total_results: u32,
}

/// Raw `?s=` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct OmdbSearchResponse {
    /// Hits. Absent when the provider has nothing to return.
    #[serde(rename = "Search", default)]
    pub search: Vec<SummaryItem>,
    /// Total hit count, sent as a string.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
}

impl From<OmdbSearchResponse> for SearchPage {
    fn from(raw: OmdbSearchResponse) -> Self {
        let total_results = raw
            .total_results
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        Self {
            items: raw.search,
            total_results,
        }
    }
}

// --- Detail ---

/// Full catalog record from `?i=`.
///
/// The summary fields are typed; everything else the provider sends
/// (ratings, plot, cast, ...) is kept in `attributes` as-is. Summary
/// fields the provider left out stay absent when serialized again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// IMDb ID.
    #[serde(rename = "imdbID")]
    pub external_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year or year range.
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Entry kind.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    /// Poster URL, or `N/A`.
    #[serde(rename = "Poster", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Provider-defined attributes.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl DetailRecord {
    /// Returns a provider attribute as a string, if present.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Leading four-digit year, used for recency ordering.
    #[must_use]
    pub fn start_year(&self) -> Option<u32> {
        let digits: String = self
            .year
            .as_deref()?
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

/// Unified search result body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Movie hits with full details.
    pub movies: Vec<DetailRecord>,
    /// Series hits with full details.
    pub series: Vec<DetailRecord>,
}

// --- Provider status ---

/// Status fields present on every OMDb payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OmdbStatus {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    /// Provider error message when `Response` is `"False"`.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbStatus {
    /// Returns the provider's failure message, if the payload signals one.
    pub(crate) fn failure(&self) -> Option<String> {
        if self.response.as_deref() == Some("False") {
            return Some(
                self.error
                    .clone()
                    .unwrap_or_else(|| String::from("provider returned Response=False")),
            );
        }
        None
    }
}

// --- Search Parameters ---

/// Parameters for a `?s=` search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search text (required).
    pub query: String,
    /// Restrict hits to one kind.
    pub kind: Option<Kind>,
    /// Restrict hits to one release year.
    pub year: Option<i32>,
    /// Result page (provider default: 1).
    pub page: Option<u32>,
}

impl SearchParams {
    /// Creates search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: None,
            year: None,
            page: None,
        }
    }

    /// Sets the kind filter.
    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Builds the provider query pairs (without the API key).
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = vec![("s", self.query.clone())];
        if let Some(ref kind) = self.kind {
            query.push(("type", String::from(kind.as_str())));
        }
        if let Some(year) = self.year {
            query.push(("y", year.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        query
    }
}
