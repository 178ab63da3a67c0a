//! Mapping of feed readings into chart-ready records.

use chrono::{FixedOffset, Local};

use super::format::{celsius, percent, ValueFormatter};
use crate::feed::{parse_timestamp, Reading, Timestamp};

/// Layout of the x-axis label.
pub const TIME_FORMAT: &str = "%H:%M";

/// Label used when a reading's time cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Zone that zoned timestamps are converted into before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelZone {
    /// The machine's local zone.
    #[default]
    Local,
    /// A fixed offset, for reproducible output.
    Fixed(FixedOffset),
}

/// Turns raw feed timestamps into short time-of-day labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeLabeler {
    zone: LabelZone,
}

impl TimeLabeler {
    pub fn local() -> Self {
        Self {
            zone: LabelZone::Local,
        }
    }

    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            zone: LabelZone::Fixed(offset),
        }
    }

    /// Label for a raw `date` value, e.g. `"2024-01-01T08:05:00"` -> `"08:05"`.
    ///
    /// Naive times are printed as they are; zoned times are shifted into the
    /// labeler's zone first.
    pub fn label(&self, raw: &str) -> String {
        match parse_timestamp(raw) {
            Some(Timestamp::Naive(t)) => t.format(TIME_FORMAT).to_string(),
            Some(Timestamp::Zoned(t)) => match self.zone {
                LabelZone::Local => t.with_timezone(&Local).format(TIME_FORMAT).to_string(),
                LabelZone::Fixed(offset) => t.with_timezone(&offset).format(TIME_FORMAT).to_string(),
            },
            None => INVALID_DATE.to_string(),
        }
    }
}

/// One point on every chart: a time label plus both series values.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub time_label: String,
    pub temperature: f64,
    pub humidity: f64,
}

/// The two value series a reading carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Temperature,
    Humidity,
}

impl Series {
    pub fn value(&self, record: &DisplayRecord) -> f64 {
        match self {
            Series::Temperature => record.temperature,
            Series::Humidity => record.humidity,
        }
    }

    /// Formatter used on this series' own chart.
    pub fn formatter(&self) -> ValueFormatter {
        match self {
            Series::Temperature => celsius,
            Series::Humidity => percent,
        }
    }
}

/// Map readings to display records, one per reading, in source order.
pub fn map_for_chart(readings: &[Reading], labeler: &TimeLabeler) -> Vec<DisplayRecord> {
    readings
        .iter()
        .map(|r| DisplayRecord {
            time_label: labeler.label(&r.timestamp),
            temperature: r.temperature,
            humidity: r.humidity,
        })
        .collect()
}
