//! Row-to-entity parsing helpers.
//!
//! Instrument timestamps are naive (instrument local time, no zone) and are
//! stored as TEXT in the `SQLite` default format so lexicographic comparison
//! in SQL matches chronological order.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::DatabaseError;

/// Storage format for datetime columns.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for date columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a naive datetime for storage.
#[must_use]
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a required TEXT column as `NaiveDateTime`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map_err(|e| DatabaseError::Query(format!("failed to parse datetime '{s}': {e}")))
}

/// Parse a required TEXT column as `NaiveDate`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DatabaseError::Query(format!("failed to parse date '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2021, 9, 6)
            .unwrap()
            .and_hms_opt(3, 10, 0)
            .unwrap();
        assert_eq!(parse_datetime(&format_datetime(dt)).unwrap(), dt);
    }

    #[test]
    fn storage_format_sorts_lexicographically() {
        let early = NaiveDate::from_ymd_opt(2021, 9, 6)
            .unwrap()
            .and_hms_opt(3, 10, 0)
            .unwrap();
        let late = early + chrono::Duration::seconds(60);
        assert!(format_datetime(early) < format_datetime(late));
    }
}
