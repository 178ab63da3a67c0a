//! Wire types for the sensor feed.
//!
//! These types match the JSON document served by the room sensor endpoint.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Naive date-time layouts accepted for the `date` field, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Top-level response body.
///
/// The field name is spelled the way the endpoint spells it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPayload {
    pub infomation: Vec<Reading>,
}

/// A single temperature/humidity sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Identifier assigned by the sensor host. Whole-number floats such as
    /// `1.0` are accepted.
    #[serde(deserialize_with = "whole_number")]
    pub id: i64,

    /// Sample time as sent by the source. Parsed on demand with [`Reading::timestamp`].
    #[serde(rename = "date")]
    pub timestamp: String,

    /// Degrees Celsius.
    pub temperature: f64,

    /// Relative humidity in percent.
    pub humidity: f64,
}

/// Deserialize an integer that the source may have encoded as a float.
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        Number::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Number::Float(f) => Err(de::Error::custom(format!("id must be a whole number, got {}", f))),
    }
}

/// A parsed sample time.
///
/// Sources either send local wall-clock time without an offset or a full
/// RFC 3339 value; the two are kept apart so that naive values are never
/// shifted between zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Wall-clock time with no zone information.
    Naive(NaiveDateTime),
    /// Time with an explicit UTC offset.
    Zoned(DateTime<FixedOffset>),
}

impl Reading {
    /// Parse the raw `date` string.
    ///
    /// Returns `None` when the value matches none of the accepted layouts.
    pub fn timestamp(&self) -> Option<Timestamp> {
        parse_timestamp(&self.timestamp)
    }
}

/// Parse a feed timestamp string.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(Timestamp::Zoned(zoned));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Timestamp::Naive(naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Timestamp::Naive)
}
