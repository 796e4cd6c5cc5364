//! Lenient timestamp parsing for request bodies.
//!
//! Clients send either RFC 3339 timestamps (`2024-01-15T10:00:00Z`,
//! `2024-01-15T12:00:00+02:00`) or naive ones without an offset (`2024-01-15T10:00:00`,
//! `2024-01-15 10:00:00.250`). Naive values are taken to be UTC.
//!
//! Only years 1 to 9999 are accepted, after conversion to UTC. Stored timestamps are
//! fixed-width text and a five-digit or negative year would not read back.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use std::ops::RangeInclusive;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Parses a timestamp in any accepted form and normalises it to UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    let ts = match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(_) => NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|naive| naive.and_utc())
            .ok_or_else(|| format!("invalid timestamp {value:?}, expected ISO 8601 date-time"))?,
    };

    if !SUPPORTED_YEARS.contains(&ts.year()) {
        return Err(format!(
            "timestamp {value:?} is out of range, year must be between {} and {}",
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        ));
    }
    Ok(ts)
}

/// `#[serde(deserialize_with = ...)]` helper for `Option<DateTime<Utc>>` fields.
pub mod optional {
    use super::parse_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
