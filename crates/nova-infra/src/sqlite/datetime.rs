//! Timestamp encoding shared by the SQLite repositories.
//!
//! New rows store RFC 3339 UTC with fixed microsecond precision so that
//! lexical order in SQL matches chronological order. Rows written by the
//! legacy server use SQLite's `CURRENT_TIMESTAMP` format and are still read.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use nova_types::error::RepositoryError;

const LEGACY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, LEGACY_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Query(format!("invalid datetime '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_datetime(&a), "2024-05-01T12:00:00.000000Z");
        let b = a + chrono::Duration::microseconds(1);
        assert!(format_datetime(&a) < format_datetime(&b));
    }

    #[test]
    fn parses_own_format() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(&now)).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn parses_legacy_format() {
        let parsed = parse_datetime("2024-03-09 18:30:05").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(RepositoryError::Query(_))
        ));
    }
}
