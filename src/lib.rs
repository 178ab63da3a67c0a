//! # room-dashboard
//!
//! A terminal dashboard for the temperature and humidity of a room.
//!
//! The dashboard fetches the sensor host's reading collection over HTTP,
//! keeps it in a keyed query cache, and draws three line charts from it:
//! temperature, humidity, and both together.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Application                         │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐ │
//! │  │  app    │───▶│   data   │───▶│    ui    │───▶│ Terminal │ │
//! │  │ (state) │    │ (mapping)│    │(rendering)    │          │ │
//! │  └────┬────┘    └──────────┘    └──────────┘    └──────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐    ┌──────────┐                                 │
//! │  │  query  │───▶│   feed   │◀── HttpFeed (GET infomation.php)│
//! │  │ (cache) │    │ (input)  │                                 │
//! │  └─────────┘    └──────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`feed`]**: The [`SensorFeed`] trait, the HTTP implementation and the
//!   wire types ([`Reading`])
//! - **[`query`]**: [`QueryClient`], a keyed cache that runs fetches on a tokio
//!   runtime and reports [`QueryState`]
//! - **[`data`]**: Reading → display record mapping, time labels, value formatters
//! - **[`ui`]**: Chart panels, header, status bar, and theme support
//! - **[`config`]**: Layered settings (file + environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live dashboard
//! room-dashboard
//!
//! # Refresh every 30 seconds, English labels
//! room-dashboard --refresh 30s --lang en
//!
//! # Fetch once and write the records to a file
//! room-dashboard --export readings.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use room_dashboard::{App, HttpFeed, QueryClient, QueryOptions};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let client = QueryClient::new(runtime.handle().clone(), QueryOptions::default());
//! let mut app = App::new(client, Arc::new(HttpFeed::new()));
//!
//! app.tick();
//! println!("{:?}", app.screen().message());
//! app.shutdown();
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod feed;
pub mod query;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{map_for_chart, DisplayRecord, TimeLabeler};
pub use feed::{FetchError, HttpFeed, Reading, SensorFeed};
pub use query::{QueryClient, QueryKey, QueryOptions, QueryState};
