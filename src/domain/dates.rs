//! Canonical date parsing for heterogeneously-shaped store values.
//!
//! Visit dates arrive from the document store in three shapes: a structured
//! timestamp object carrying epoch seconds, a `D/M/YYYY` string entered by
//! residents, or some other string form (usually RFC 3339). [`parse_date`]
//! normalizes all of them into a [`ParsedDate`], the single source of
//! parsing semantics for every consumer. A value that cannot be parsed is
//! reported as [`ParsedDate::Invalid`], never silently replaced with "now"
//! or epoch zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Outcome of normalizing a raw date value into a canonical instant.
///
/// `Invalid` and `Missing` are both "date unknown" for bucketing purposes,
/// but are kept distinct so the API can tell "no date was recorded" apart
/// from "a date was recorded but is garbage".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// A valid canonical instant (UTC).
    Instant(DateTime<Utc>),
    /// A value was present but could not be parsed as a calendar date.
    Invalid,
    /// No value was present.
    Missing,
}

impl ParsedDate {
    /// Returns the canonical instant, if this date is known.
    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(t) => Some(*t),
            Self::Invalid | Self::Missing => None,
        }
    }

    /// Returns `true` if this date resolved to a canonical instant.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Instant(_))
    }
}

/// Parses a raw document field into a [`ParsedDate`].
///
/// Accepted inputs, in priority order:
/// 1. An object exposing integer epoch seconds under `seconds` or
///    `_seconds`, with optional `nanoseconds` / `_nanoseconds`.
/// 2. A `D/M/YYYY` string (1-2 digit day and month, 4-digit year),
///    interpreted day-month-year at midnight UTC.
/// 3. Any other string, tried as RFC 3339, then `YYYY-MM-DD`, then
///    `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn parse_date(value: Option<&Value>) -> ParsedDate {
    let Some(value) = value else {
        return ParsedDate::Missing;
    };
    match value {
        Value::Null => ParsedDate::Missing,
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64);
            let Some(seconds) = seconds else {
                return ParsedDate::Invalid;
            };
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            match DateTime::from_timestamp(seconds, nanos) {
                Some(t) => ParsedDate::Instant(t),
                None => ParsedDate::Invalid,
            }
        }
        Value::String(s) => parse_date_str(s),
        _ => ParsedDate::Invalid,
    }
}

/// Parses a string date in any of the accepted string shapes.
#[must_use]
pub fn parse_date_str(raw: &str) -> ParsedDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return ParsedDate::Missing;
    }
    if raw.contains('/') {
        // Slash-shaped strings are always day/month/year; a slash string
        // that fails calendar validation is Invalid, not retried elsewhere.
        return match parse_slash_date(raw) {
            Some(date) => ParsedDate::Instant(midnight_utc(date)),
            None => ParsedDate::Invalid,
        };
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return ParsedDate::Instant(t.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return ParsedDate::Instant(midnight_utc(d));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return ParsedDate::Instant(dt.and_utc());
    }
    ParsedDate::Invalid
}

/// Parses `D/M/YYYY` (day-month-year, NOT month-day-year).
fn parse_slash_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('/');
    let day = parse_component(parts.next()?, 1, 2)?;
    let month = parse_component(parts.next()?, 1, 2)?;
    let year = parse_component(parts.next()?, 4, 4)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Parses an all-digit component with a length bound.
fn parse_component(s: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if s.len() < min_len || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Lifts a calendar date to its midnight instant in UTC.
fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use serde_json::json;

    #[test]
    fn slash_string_is_day_month_year() {
        let parsed = parse_date(Some(&json!("23/5/2025")));
        let Some(t) = parsed.instant() else {
            panic!("expected valid date");
        };
        assert_eq!((t.year(), t.month(), t.day()), (2025, 5, 23));
    }

    #[test]
    fn garbage_string_is_invalid_not_now() {
        assert_eq!(parse_date(Some(&json!("not-a-date"))), ParsedDate::Invalid);
    }

    #[test]
    fn timestamp_object_converts_directly() {
        let parsed = parse_date(Some(&json!({"seconds": 1_748_995_200, "nanoseconds": 0})));
        let Some(t) = parsed.instant() else {
            panic!("expected valid date");
        };
        assert_eq!(t, Utc.timestamp_opt(1_748_995_200, 0).single().unwrap_or_default());
    }

    #[test]
    fn underscore_prefixed_timestamp_fields_accepted() {
        let parsed = parse_date(Some(&json!({"_seconds": 1_000, "_nanoseconds": 500})));
        assert!(parsed.is_known());
    }

    #[test]
    fn timestamp_object_without_seconds_is_invalid() {
        assert_eq!(parse_date(Some(&json!({"millis": 1}))), ParsedDate::Invalid);
    }

    #[test]
    fn rfc3339_string_parses() {
        let parsed = parse_date(Some(&json!("2025-06-01T08:30:00Z")));
        let Some(t) = parsed.instant() else {
            panic!("expected valid date");
        };
        assert_eq!((t.year(), t.month(), t.day()), (2025, 6, 1));
    }

    #[test]
    fn plain_calendar_date_parses_at_midnight() {
        let parsed = parse_date(Some(&json!("2025-06-01")));
        let Some(t) = parsed.instant() else {
            panic!("expected valid date");
        };
        assert_eq!(t.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn impossible_slash_date_is_invalid() {
        assert_eq!(parse_date(Some(&json!("31/2/2025"))), ParsedDate::Invalid);
        assert_eq!(parse_date(Some(&json!("1/13/2025"))), ParsedDate::Invalid);
    }

    #[test]
    fn slash_date_never_treats_first_component_as_month() {
        // 23 cannot be a month; under month-day-year this would fail.
        assert!(parse_date(Some(&json!("23/5/2025"))).is_known());
    }

    #[test]
    fn absent_and_null_are_missing() {
        assert_eq!(parse_date(None), ParsedDate::Missing);
        assert_eq!(parse_date(Some(&Value::Null)), ParsedDate::Missing);
        assert_eq!(parse_date(Some(&json!(""))), ParsedDate::Missing);
    }

    #[test]
    fn numbers_and_arrays_are_invalid() {
        assert_eq!(parse_date(Some(&json!(42))), ParsedDate::Invalid);
        assert_eq!(parse_date(Some(&json!([2025, 5, 23]))), ParsedDate::Invalid);
    }
}
