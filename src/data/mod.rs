//! Transformation of feed readings into chart-friendly data.
//!
//! ## Submodules
//!
//! - [`chart`]: Reading → [`DisplayRecord`] mapping and time labels
//! - [`format`]: Per-series value formatters (`℃`, `%`)
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "30s", "1m")
//!
//! ## Data Flow
//!
//! ```text
//! Vec<Reading> (from the query cache)
//!        │
//!        ▼
//! map_for_chart(readings, &TimeLabeler)
//!        │
//!        ▼
//! Vec<DisplayRecord> ──▶ ui::dashboard::build_screen()
//! ```

pub mod chart;
pub mod duration;
pub mod format;

pub use chart::{map_for_chart, DisplayRecord, LabelZone, Series, TimeLabeler};
pub use format::{celsius, format_number, percent, ValueFormatter};
