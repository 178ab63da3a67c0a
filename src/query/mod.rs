//! Keyed query cache that drives feed fetches.
//!
//! The [`QueryClient`] owns one cache entry per [`QueryKey`]. Fetches run as
//! tasks on a tokio runtime while the UI keeps drawing; the UI asks for the
//! current [`QueryState`] once per frame with [`QueryClient::observe`], which
//! also decides whether a new fetch is due.
//!
//! ## Fetch triggers
//!
//! ```text
//! first observe ─────┐
//! invalidate() ──────┤
//! focus_gained() ────┼──▶ fetch (at most one in flight per key)
//! refetch interval ──┘          │
//!                               ▼
//!                  completion channel ──▶ drained by observe()
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::feed::{FetchError, Reading, SensorFeed};

/// Identifier of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the UI sees for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// No data yet and no failure recorded.
    Loading,
    /// The most recent fetch failed.
    Error(String),
    /// Data from the most recent successful fetch.
    Success(Arc<[Reading]>),
}

impl QueryState {
    /// Returns the readings if the query succeeded.
    pub fn data(&self) -> Option<&[Reading]> {
        match self {
            QueryState::Success(readings) => Some(readings),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }
}

/// Refetch policy.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// How long data counts as fresh. Fresh data is not refetched on focus.
    pub stale_time: Duration,
    /// Refetch on a timer. `None` disables timer-driven refreshes.
    pub refetch_interval: Option<Duration>,
    /// Refetch stale data when the terminal regains focus.
    pub refetch_on_focus: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            refetch_interval: None,
            refetch_on_focus: true,
        }
    }
}

#[derive(Debug, Default)]
struct Entry {
    data: Option<Arc<[Reading]>>,
    error: Option<String>,
    updated_at: Option<Instant>,
    last_attempt: Option<Instant>,
    invalidated: bool,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl Entry {
    fn state(&self) -> QueryState {
        if let Some(ref err) = self.error {
            QueryState::Error(err.clone())
        } else if let Some(ref data) = self.data {
            QueryState::Success(Arc::clone(data))
        } else {
            QueryState::Loading
        }
    }

    fn is_stale(&self, stale_time: Duration) -> bool {
        self.updated_at.map_or(true, |t| t.elapsed() >= stale_time)
    }

    fn is_due(&self, options: &QueryOptions, now: Instant) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        let Some(last) = self.last_attempt else {
            return true;
        };
        if self.invalidated {
            return true;
        }
        matches!(options.refetch_interval, Some(interval) if now.duration_since(last) >= interval)
    }
}

struct Completion {
    key: QueryKey,
    generation: u64,
    result: Result<Vec<Reading>, FetchError>,
}

/// Cache of query entries plus the machinery to refresh them.
///
/// Created once by the application and passed to whatever needs it. Call
/// [`QueryClient::dispose`] (or drop it) to abort running fetches.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use room_dashboard::{HttpFeed, QueryClient, QueryKey, QueryOptions, SensorFeed};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let mut client = QueryClient::new(runtime.handle().clone(), QueryOptions::default());
/// let feed: Arc<dyn SensorFeed> = Arc::new(HttpFeed::new());
///
/// let state = client.observe(&QueryKey::new("readings"), &feed);
/// assert!(state.is_loading());
/// client.dispose();
/// ```
#[derive(Debug)]
pub struct QueryClient {
    runtime: Handle,
    options: QueryOptions,
    entries: HashMap<QueryKey, Entry>,
    next_generation: u64,
    sender: mpsc::UnboundedSender<Completion>,
    receiver: mpsc::UnboundedReceiver<Completion>,
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

impl QueryClient {
    /// Create an empty client that spawns fetches on `runtime`.
    pub fn new(runtime: Handle, options: QueryOptions) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        debug!(?options, "query client created");
        Self {
            runtime,
            options,
            entries: HashMap::new(),
            next_generation: 0,
            sender,
            receiver,
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Return the current state for `key`, starting a fetch if one is due.
    ///
    /// Never blocks. Finished fetches are applied before the state is read.
    pub fn observe(&mut self, key: &QueryKey, feed: &Arc<dyn SensorFeed>) -> QueryState {
        self.drain();

        let now = Instant::now();
        let due = self.entries.get(key).map_or(true, |e| e.is_due(&self.options, now));
        if due {
            self.start_fetch(key, feed);
        }

        self.entries.get(key).map_or(QueryState::Loading, Entry::state)
    }

    /// Mark `key` for refetch at the next observe.
    ///
    /// Has no effect while a fetch for the key is already running.
    pub fn invalidate(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            if entry.in_flight.is_some() {
                debug!(key = %key, "invalidate ignored, fetch already running");
            } else {
                entry.invalidated = true;
            }
        }
    }

    /// Invalidate every stale entry, if the options ask for refetch on focus.
    pub fn focus_gained(&mut self) {
        if !self.options.refetch_on_focus {
            return;
        }

        let stale_time = self.options.stale_time;
        for (key, entry) in &mut self.entries {
            if entry.in_flight.is_none() && entry.is_stale(stale_time) {
                debug!(key = %key, "refetching on focus");
                entry.invalidated = true;
            }
        }
    }

    /// Drop the entry for `key`, aborting its fetch if one is running.
    pub fn remove(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.remove(key) {
            if let Some(task) = entry.in_flight {
                task.abort();
            }
        }
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.in_flight.is_some())
    }

    /// When the data for `key` last arrived.
    pub fn updated_at(&self, key: &QueryKey) -> Option<Instant> {
        self.entries.get(key).and_then(|e| e.updated_at)
    }

    /// Tear the client down, aborting every running fetch.
    pub fn dispose(self) {
        info!(entries = self.entries.len(), "disposing query client");
    }

    fn start_fetch(&mut self, key: &QueryKey, feed: &Arc<dyn SensorFeed>) {
        self.next_generation += 1;
        let generation = self.next_generation;

        debug!(key = %key, generation, source = feed.description(), "starting fetch");

        let sender = self.sender.clone();
        let feed = Arc::clone(feed);
        let task_key = key.clone();
        let task = self.runtime.spawn(async move {
            let result = feed.fetch_readings().await;
            // The receiver lives as long as the client; a send error means it is gone
            let _ = sender.send(Completion {
                key: task_key,
                generation,
                result,
            });
        });

        let entry = self.entries.entry(key.clone()).or_default();
        entry.generation = generation;
        entry.invalidated = false;
        entry.last_attempt = Some(Instant::now());
        entry.in_flight = Some(task);
    }

    fn drain(&mut self) {
        while let Ok(done) = self.receiver.try_recv() {
            let Some(entry) = self.entries.get_mut(&done.key) else {
                continue;
            };
            if entry.generation != done.generation {
                debug!(key = %done.key, generation = done.generation, "discarding superseded result");
                continue;
            }

            entry.in_flight = None;
            match done.result {
                Ok(readings) => {
                    info!(key = %done.key, count = readings.len(), "query succeeded");
                    entry.data = Some(readings.into());
                    entry.error = None;
                    entry.updated_at = Some(Instant::now());
                }
                Err(err) => {
                    warn!(key = %done.key, error = %err, "query failed");
                    entry.error = Some(err.to_string());
                }
            }
        }
    }
}

impl Drop for QueryClient {
    fn drop(&mut self) {
        for entry in self.entries.values_mut() {
            if let Some(task) = entry.in_flight.take() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{sample_readings, ScriptedFeed};

    fn key() -> QueryKey {
        QueryKey::new("readings")
    }

    fn client(options: QueryOptions) -> QueryClient {
        QueryClient::new(Handle::current(), options)
    }

    /// Observe until no fetch is running and return the final state.
    async fn settle(client: &mut QueryClient, feed: &Arc<dyn SensorFeed>) -> QueryState {
        for _ in 0..200 {
            let state = client.observe(&key(), feed);
            if !client.is_fetching(&key()) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("query did not settle");
    }

    #[tokio::test]
    async fn test_first_observe_is_loading_then_success() {
        let scripted = Arc::new(ScriptedFeed::new().respond_with(sample_readings()));
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        assert_eq!(client.observe(&key(), &feed), QueryState::Loading);
        assert!(client.is_fetching(&key()));

        let state = settle(&mut client, &feed).await;
        assert_eq!(state.data().unwrap().len(), 3);
        assert!(client.updated_at(&key()).is_some());
        assert_eq!(scripted.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_observes_share_one_fetch() {
        let scripted = Arc::new(ScriptedFeed::gated().respond_with(sample_readings()));
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        for _ in 0..5 {
            assert!(client.observe(&key(), &feed).is_loading());
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(scripted.calls(), 1);

        scripted.release();
        let state = settle(&mut client, &feed).await;
        assert!(state.data().is_some());
        assert_eq!(scripted.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_refetch_without_trigger() {
        let scripted = Arc::new(ScriptedFeed::new().respond_with(sample_readings()));
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        settle(&mut client, &feed).await;
        for _ in 0..10 {
            client.observe(&key(), &feed);
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(scripted.calls(), 1);
    }

    #[tokio::test]
    async fn test_error_state_carries_reason() {
        let scripted = Arc::new(ScriptedFeed::new().fail_with(502));
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        let state = settle(&mut client, &feed).await;
        let QueryState::Error(reason) = state else {
            panic!("expected error state, got {:?}", state);
        };
        assert!(reason.contains("502"));
        assert!(client.updated_at(&key()).is_none());
    }

    #[tokio::test]
    async fn test_error_clears_after_success() {
        let scripted = Arc::new(ScriptedFeed::new().fail_with(500).respond_with(sample_readings()));
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        assert!(matches!(settle(&mut client, &feed).await, QueryState::Error(_)));

        client.invalidate(&key());
        let state = settle(&mut client, &feed).await;
        assert_eq!(state.data().unwrap().len(), 3);
        assert_eq!(scripted.calls(), 2);
    }

    #[tokio::test]
    async fn test_refetch_keeps_previous_data_visible() {
        let scripted = Arc::new(
            ScriptedFeed::gated()
                .respond_with(sample_readings())
                .respond_with(sample_readings()[..1].to_vec()),
        );
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        client.observe(&key(), &feed);
        scripted.release();
        settle(&mut client, &feed).await;

        client.invalidate(&key());
        let during = client.observe(&key(), &feed);
        assert_eq!(during.data().unwrap().len(), 3);
        assert!(client.is_fetching(&key()));

        scripted.release();
        let after = settle(&mut client, &feed).await;
        assert_eq!(after.data().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_while_fetching_does_not_queue_another() {
        let scripted = Arc::new(ScriptedFeed::gated());
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        client.observe(&key(), &feed);
        client.invalidate(&key());
        scripted.release();
        settle(&mut client, &feed).await;

        client.observe(&key(), &feed);
        assert_eq!(scripted.calls(), 1);
    }

    #[tokio::test]
    async fn test_refetch_interval() {
        let scripted = Arc::new(ScriptedFeed::new());
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions {
            refetch_interval: Some(Duration::from_millis(30)),
            ..QueryOptions::default()
        });

        settle(&mut client, &feed).await;
        assert_eq!(scripted.calls(), 1);

        tokio::time::sleep(Duration::from_millis(40)).await;
        client.observe(&key(), &feed);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(scripted.calls(), 2);
    }

    #[tokio::test]
    async fn test_focus_refetches_stale_data() {
        let scripted = Arc::new(ScriptedFeed::new());
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        settle(&mut client, &feed).await;
        client.focus_gained();
        settle(&mut client, &feed).await;
        assert_eq!(scripted.calls(), 2);
    }

    #[tokio::test]
    async fn test_focus_keeps_fresh_data() {
        let scripted = Arc::new(ScriptedFeed::new());
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions {
            stale_time: Duration::from_secs(60),
            ..QueryOptions::default()
        });

        settle(&mut client, &feed).await;
        client.focus_gained();
        settle(&mut client, &feed).await;
        assert_eq!(scripted.calls(), 1);
    }

    #[tokio::test]
    async fn test_focus_refetch_disabled() {
        let scripted = Arc::new(ScriptedFeed::new());
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions {
            refetch_on_focus: false,
            ..QueryOptions::default()
        });

        settle(&mut client, &feed).await;
        client.focus_gained();
        settle(&mut client, &feed).await;
        assert_eq!(scripted.calls(), 1);
    }

    #[tokio::test]
    async fn test_remove_discards_entry() {
        let scripted = Arc::new(ScriptedFeed::new().respond_with(sample_readings()));
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        settle(&mut client, &feed).await;
        client.remove(&key());
        assert!(client.updated_at(&key()).is_none());

        // The next observe behaves like a fresh mount
        assert!(client.observe(&key(), &feed).is_loading());
        settle(&mut client, &feed).await;
        assert_eq!(scripted.calls(), 2);
    }

    #[tokio::test]
    async fn test_dispose_aborts_running_fetch() {
        let scripted = Arc::new(ScriptedFeed::gated());
        let feed: Arc<dyn SensorFeed> = scripted.clone();
        let mut client = client(QueryOptions::default());

        client.observe(&key(), &feed);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(Arc::strong_count(&scripted), 3);

        client.dispose();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(Arc::strong_count(&scripted), 2);
    }
}
