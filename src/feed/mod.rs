//! Sensor feed abstraction for fetching room readings.
//!
//! The dashboard talks to the feed through the [`SensorFeed`] trait so the
//! query layer does not care whether readings come from the real HTTP
//! endpoint or from an in-memory stand-in.

mod error;
mod reading;

#[cfg(test)]
pub(crate) mod testing;

pub use error::FetchError;
pub use reading::{parse_timestamp, FeedPayload, Reading, Timestamp};

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Address of the room sensor host.
pub const ENDPOINT: &str = "http://100.64.1.33/infomation.php";

/// Trait for fetching the current reading collection.
///
/// # Example
///
/// ```no_run
/// use room_dashboard::{HttpFeed, SensorFeed};
///
/// # tokio_test::block_on(async {
/// let feed = HttpFeed::new();
/// let readings = feed.fetch_readings().await?;
/// println!("Got {} readings", readings.len());
/// # Ok::<_, room_dashboard::FetchError>(())
/// # });
/// ```
#[async_trait]
pub trait SensorFeed: Send + Sync + Debug {
    /// Fetch every reading the source currently serves, in source order.
    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError>;

    /// Returns a human-readable description of the feed.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}

/// Feed backed by the sensor host's JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    endpoint: String,
    http: Client,
}

impl Default for HttpFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFeed {
    /// Create a feed pointed at the sensor host.
    pub fn new() -> Self {
        Self::with_endpoint(ENDPOINT)
    }

    /// Create a feed pointed at another address.
    ///
    /// Only tests use this; the binary always talks to [`ENDPOINT`].
    #[doc(hidden)]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    /// Returns the URL being fetched.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self) -> Result<Vec<Reading>, FetchError> {
        let response = self.http.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let payload: FeedPayload = serde_json::from_str(&body)?;

        Ok(payload.infomation)
    }
}

#[async_trait]
impl SensorFeed for HttpFeed {
    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
        debug!(endpoint = %self.endpoint, "fetching readings");

        match self.request().await {
            Ok(readings) => {
                debug!(count = readings.len(), "readings received");
                Ok(readings)
            }
            Err(err) => {
                warn!(endpoint = %self.endpoint, error = %err, "fetch failed");
                Err(err)
            }
        }
    }

    fn description(&self) -> &str {
        &self.endpoint
    }
}
