//! Presentation helpers for unified search results.

use std::cmp::Reverse;

use cinegate_api::omdb::DetailRecord;

/// Number of suggestions shown for a search.
pub const SUGGESTION_LIMIT: usize = 5;

/// Sorts by release year, newest first, and keeps at most `limit`.
///
/// Records without a parsable year sort last. Ties keep search order.
#[must_use]
pub fn latest_first(mut records: Vec<DetailRecord>, limit: usize) -> Vec<DetailRecord> {
    records.sort_by_key(|record| Reverse(record.start_year()));
    records.truncate(limit);
    records
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn record(id: &str, year: &str) -> DetailRecord {
        serde_json::from_value(serde_json::json!({
            "imdbID": id,
            "Title": id,
            "Year": year,
            "Type": "movie",
        }))
        .unwrap()
    }

    #[test]
    fn test_newest_first_and_limited() {
        // Arrange
        let records = vec![
            record("a", "1989"),
            record("b", "2022"),
            record("c", "2005"),
            record("d", "2008"),
            record("e", "1992"),
            record("f", "2012"),
        ];

        // Act
        let sorted = latest_first(records, SUGGESTION_LIMIT);

        // Assert
        let ids: Vec<&str> = sorted.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "f", "d", "c", "e"]);
    }

    #[test]
    fn test_unparsable_year_sorts_last() {
        // Arrange
        let records = vec![record("n/a", "N/A"), record("old", "1966")];

        // Act
        let sorted = latest_first(records, SUGGESTION_LIMIT);

        // Assert
        assert_eq!(sorted[0].external_id, "old");
        assert_eq!(sorted[1].external_id, "n/a");
    }

    #[test]
    fn test_series_ranges_use_start_year() {
        // Arrange
        let records = vec![record("x", "2011–2019"), record("y", "2015")];

        // Act
        let sorted = latest_first(records, SUGGESTION_LIMIT);

        // Assert
        assert_eq!(sorted[0].external_id, "y");
    }
}
