//! Layered settings.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config PATH`, or `room-dashboard.toml` in the working
//!    directory when present)
//! 3. Environment variables prefixed with `ROOM_DASHBOARD_`
//! 4. Command-line flags (applied by the binary)
//!
//! ```toml
//! refresh_interval = "30s"
//! temperature_floor = 20
//! humidity_floor = 30
//! theme = "dark"
//! language = "en"
//! log_file = "room-dashboard.log"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::query::QueryOptions;
use crate::ui::dashboard::ChartSettings;
use crate::ui::{Language, ThemeChoice};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "room-dashboard.toml";

/// Prefix for environment overrides, e.g. `ROOM_DASHBOARD_REFRESH_INTERVAL=1m`.
pub const ENV_PREFIX: &str = "ROOM_DASHBOARD";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Timer-driven refresh, e.g. "30s". Unset means refresh on demand only.
    pub refresh_interval: Option<String>,
    /// How long fetched data counts as fresh, e.g. "10s".
    pub stale_time: String,
    /// Refetch stale data when the terminal regains focus.
    pub refetch_on_focus: bool,
    /// Y-axis minimum of the temperature chart.
    pub temperature_floor: f64,
    /// Y-axis minimum of the humidity chart.
    pub humidity_floor: f64,
    pub theme: ThemeChoice,
    pub language: Language,
    /// Where to write logs. Logging is off when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval: None,
            stale_time: "0s".to_string(),
            refetch_on_focus: true,
            temperature_floor: 25.0,
            humidity_floor: 40.0,
            theme: ThemeChoice::Auto,
            language: Language::Japanese,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from file and environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature_floor.is_finite() || !self.humidity_floor.is_finite() {
            bail!("Chart floors must be finite numbers");
        }
        self.query_options().map(|_| ())
    }

    /// Refetch policy for the query client.
    pub fn query_options(&self) -> Result<QueryOptions> {
        let refetch_interval = match self.refresh_interval.as_deref() {
            Some(raw) => {
                let interval = parse_duration(raw)
                    .with_context(|| format!("Invalid refresh_interval: {}", raw))?;
                // A zero interval would refetch on every frame
                (!interval.is_zero()).then_some(interval)
            }
            None => None,
        };

        let stale_time = parse_duration(&self.stale_time)
            .with_context(|| format!("Invalid stale_time: {}", self.stale_time))?;

        Ok(QueryOptions {
            stale_time,
            refetch_interval,
            refetch_on_focus: self.refetch_on_focus,
        })
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            temperature_floor: self.temperature_floor,
            humidity_floor: self.humidity_floor,
        }
    }
}
