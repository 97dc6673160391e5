//! Type coercion for raw CSV cells
//!
//! All coercion happens once, at load time. Numeric cells that cannot be
//! parsed become missing; flags accept the usual boolean spellings
//! including `0`/`1`.

use crate::types::{Rate, Timestamp};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Cells that mean "no value"
pub fn is_missing(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "nan" | "null" | "none" | "na" | "n/a"
    )
}

/// Parse a boolean flag: true/false, t/f, yes/no, y/n or an integer
/// (non-zero is true), case-insensitive
pub fn parse_bool(raw: &str) -> Option<bool> {
    let value = raw.trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "t" | "yes" | "y" => Some(true),
        "false" | "f" | "no" | "n" => Some(false),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v != 0.0),
    }
}

/// Parse a numeric amount; anything non-numeric or non-finite is missing
pub fn parse_amount(raw: &str) -> Option<f64> {
    if is_missing(raw) {
        return None;
    }
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a rate cell; anything that is not a positive number is missing
pub fn parse_rate(raw: &str) -> Option<Rate> {
    parse_amount(raw).filter(|rate| *rate > 0.0)
}

/// Parse a timestamp and normalize it to UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` with or without an offset
/// (no offset means UTC), and a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date with `format`, falling back to the date part of
/// a full timestamp
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), format)
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(" 1.0 "), Some(true));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50"), Some(12.5));
        assert_eq!(parse_amount(" 7 "), Some(7.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("0.92"), Some(0.92));
        assert_eq!(parse_rate("0"), None);
        assert_eq!(parse_rate("-1.5"), None);
        assert_eq!(parse_rate(""), None);
        assert_eq!(parse_rate("n/a"), None);
    }

    #[test]
    fn test_parse_timestamp_offsets_normalize_to_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 9, 30, 22, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-10-01T01:30:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-10-01 01:30:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-09-30 22:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-09-30T22:30:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_fractional_and_date_only() {
        let ts = parse_timestamp("2024-09-30 00:00:01.932884").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());

        assert_eq!(
            parse_timestamp("2024-09-30"),
            Some(Utc.with_ymd_and_hms(2024, 9, 30, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_date() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert_eq!(parse_date("2024-10-01", "%Y-%m-%d"), Some(date));
        assert_eq!(parse_date("01/10/2024", "%d/%m/%Y"), Some(date));
        assert_eq!(parse_date("2024-10-01 00:00:00", "%Y-%m-%d"), Some(date));
        assert_eq!(parse_date("garbage", "%Y-%m-%d"), None);
    }
}
