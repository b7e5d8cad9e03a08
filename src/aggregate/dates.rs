//! Feed date normalization.
//!
//! Publisher feeds carry dates in a handful of shapes: RFC 822 with numeric
//! or named zones, several ISO 8601 variants, and the occasional bare date.
//! An ordered list of parser strategies is tried against the raw string and
//! the first success wins. First-match, not best-match: a string that two
//! strategies could parse always resolves to the earlier one, which keeps
//! the sort order of historical data stable.
//!
//! Timestamps without an explicit zone are taken as UTC. Anything
//! unparseable (or empty) normalizes to the current time, so such items sort
//! as freshly published.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

type DateStrategy = fn(&str) -> Option<DateTime<Utc>>;

const STRATEGIES: &[DateStrategy] = &[
    rfc822_numeric_zone,
    rfc822_named_zone,
    iso_with_offset,
    iso_zulu,
    iso_fractional_with_offset,
    bare_datetime,
    bare_date,
];

/// Normalize a raw feed date string to a UTC instant.
pub fn parse_feed_date(raw: &str) -> DateTime<Utc> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Utc::now();
    }
    for strategy in STRATEGIES {
        if let Some(dt) = strategy(trimmed) {
            return dt;
        }
    }
    Utc::now()
}

/// `Mon, 02 Jan 2006 15:04:05 +0000`
fn rfc822_numeric_zone(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `Mon, 02 Jan 2006 15:04:05 GMT`. chrono cannot parse named zones, so the
/// trailing alphabetic token is split off and the remainder is read as a
/// naive timestamp, assumed UTC (named zones in the wild are almost always
/// GMT/UT anyway).
fn rfc822_named_zone(s: &str) -> Option<DateTime<Utc>> {
    let (rest, zone) = s.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    NaiveDateTime::parse_from_str(rest, "%a, %d %b %Y %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// `2006-01-02T15:04:05+02:00`
fn iso_with_offset(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `2006-01-02T15:04:05Z`
fn iso_zulu(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")
        .ok()
        .map(|dt| dt.and_utc())
}

/// `2006-01-02T15:04:05.999+02:00`
fn iso_fractional_with_offset(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `2006-01-02 15:04:05`
fn bare_datetime(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// `2006-01-02`, normalized to midnight UTC.
fn bare_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
