//! In-memory feed for exercising the query and app layers in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{FetchError, Reading, SensorFeed};

/// Feed that replays queued responses and counts calls.
///
/// When gated, every fetch waits for [`ScriptedFeed::release`] before
/// answering, which keeps a request in flight for as long as a test needs.
#[derive(Debug, Default)]
pub(crate) struct ScriptedFeed {
    responses: Mutex<VecDeque<Result<Vec<Reading>, u16>>>,
    calls: AtomicUsize,
    gate: Option<Notify>,
}

impl ScriptedFeed {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub(crate) fn respond_with(self, readings: Vec<Reading>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(readings));
        self
    }

    pub(crate) fn fail_with(self, status: u16) -> Self {
        self.responses.lock().unwrap().push_back(Err(status));
        self
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SensorFeed for ScriptedFeed {
    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        // An exhausted script keeps answering with an empty collection
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(readings)) => Ok(readings),
            Some(Err(status)) => Err(FetchError::Status(
                reqwest::StatusCode::from_u16(status).unwrap(),
            )),
            None => Ok(Vec::new()),
        }
    }

    fn description(&self) -> &str {
        "scripted"
    }
}

/// Build a reading with the given time and values.
pub(crate) fn reading(id: i64, date: &str, temperature: f64, humidity: f64) -> Reading {
    Reading {
        id,
        timestamp: date.to_string(),
        temperature,
        humidity,
    }
}

/// A short morning series.
pub(crate) fn sample_readings() -> Vec<Reading> {
    vec![
        reading(1, "2024-01-01T08:00:00", 25.5, 50.0),
        reading(2, "2024-01-01T08:05:00", 26.0, 49.0),
        reading(3, "2024-01-01T08:10:00", 26.4, 47.5),
    ]
}
