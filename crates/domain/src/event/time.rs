//! Parsing of `xsd:dateTime` literals.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses an `xsd:dateTime` (or `xsd:date`) literal into a UTC instant.
///
/// Accepted forms, in order:
/// - RFC 3339 with an offset or `Z` (`2020-06-01T10:00:00+02:00`)
/// - a local date-time without offset, read as UTC (`2020-06-01T10:00:00`)
/// - a bare date, read as midnight UTC (`2020-06-01`)
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
