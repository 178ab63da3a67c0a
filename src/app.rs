//! Application state and user actions.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::data::{map_for_chart, DisplayRecord, TimeLabeler};
use crate::feed::SensorFeed;
use crate::query::{QueryClient, QueryKey, QueryState};
use crate::ui::dashboard::{build_screen, ChartSettings, Screen};
use crate::ui::{Labels, Theme};

/// Cache key of the reading collection.
pub const READINGS_KEY: &str = "sensor-readings";

/// File written by the in-app export action.
pub const EXPORT_FILE: &str = "room_dashboard_export.json";

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Query state as of the last tick
    pub state: QueryState,

    // Presentation
    pub theme: Theme,
    pub labels: Labels,
    pub chart_settings: ChartSettings,
    pub labeler: TimeLabeler,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    client: QueryClient,
    feed: Arc<dyn SensorFeed>,
    key: QueryKey,
}

impl App {
    /// Create a new App reading from `feed` through `client`.
    pub fn new(client: QueryClient, feed: Arc<dyn SensorFeed>) -> Self {
        Self {
            running: true,
            show_help: false,
            state: QueryState::Loading,
            theme: Theme::dark(),
            labels: Labels::default(),
            chart_settings: ChartSettings::default(),
            labeler: TimeLabeler::local(),
            status_message: None,
            client,
            feed,
            key: QueryKey::new(READINGS_KEY),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_chart_settings(mut self, chart_settings: ChartSettings) -> Self {
        self.chart_settings = chart_settings;
        self
    }

    pub fn with_labeler(mut self, labeler: TimeLabeler) -> Self {
        self.labeler = labeler;
        self
    }

    /// Refresh `state` from the query client. Called once per frame.
    pub fn tick(&mut self) {
        self.state = self.client.observe(&self.key, &self.feed);
    }

    /// What the dashboard area should show for the current state.
    pub fn screen(&self) -> Screen {
        build_screen(&self.state, &self.chart_settings, &self.labels, &self.labeler)
    }

    /// Ask for fresh readings on the next tick.
    pub fn refresh(&mut self) {
        info!("manual refresh requested");
        self.client.invalidate(&self.key);
        self.set_status_message("Refreshing...".to_string());
    }

    /// The terminal regained focus.
    pub fn focus_gained(&mut self) {
        self.client.focus_gained();
    }

    pub fn is_fetching(&self) -> bool {
        self.client.is_fetching(&self.key)
    }

    /// When readings last arrived.
    pub fn last_updated(&self) -> Option<Instant> {
        self.client.updated_at(&self.key)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.client.options().refetch_interval
    }

    /// Returns a description of the sensor feed.
    pub fn source_description(&self) -> &str {
        self.feed.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the readings on screen to a JSON file.
    ///
    /// Returns the number of records written.
    pub fn export_state(&self, path: &Path) -> Result<usize> {
        let Some(readings) = self.state.data() else {
            bail!("No readings to export");
        };

        let records = map_for_chart(readings, &self.labeler);
        export_records(&records, &self.labels, path)?;
        Ok(records.len())
    }

    /// Dispose the query client, aborting any running fetch.
    pub fn shutdown(self) {
        self.client.dispose();
    }
}

/// Build the export document: one object per record, keyed by display labels.
pub fn records_to_json(records: &[DisplayRecord], labels: &Labels) -> serde_json::Value {
    let rows = records
        .iter()
        .map(|r| {
            let mut row = serde_json::Map::new();
            row.insert(labels.time.to_string(), serde_json::json!(r.time_label));
            row.insert(labels.temperature.to_string(), serde_json::json!(r.temperature));
            row.insert(labels.humidity.to_string(), serde_json::json!(r.humidity));
            serde_json::Value::Object(row)
        })
        .collect();

    serde_json::Value::Array(rows)
}

/// Write records to `path` as pretty-printed JSON.
pub fn export_records(records: &[DisplayRecord], labels: &Labels, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&records_to_json(records, labels))?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), count = records.len(), "exported records");
    Ok(())
}
