//! # signalboard
//!
//! A terminal dashboard and library for service health signals.
//!
//! A signal is a named measurement in `[0, 1]` with an optional tree of
//! dependency signals. Signals are fetched from an HTTP API, classified
//! (success, warning, error) and shown either as a status table of every
//! signal or as one signal with its full dependency chain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (routes)│    │(classify)│    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | FileSource | ChannelSource     │
//! │  │ (fetch) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Routes (`/` and `/signal/:id`), navigation history, and
//!   per-view loading state
//! - **[`source`]**: Non-blocking fetches behind the [`SignalSource`] trait
//! - **[`data`]**: Signal records and their classification
//! - **[`ui`]**: Rendering with ratatui
//! - **[`config`]**: Layered settings (file, environment)
//! - **[`export`]**: JSON export of decorated signals
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the API on localhost:8080
//! signalboard
//!
//! # Open one signal directly
//! signalboard --url http://status.internal:8080 --route /signal/api
//!
//! # Dump every decorated signal and exit
//! signalboard --export signals.json
//! ```
//!
//! ### Classifying signals
//!
//! ```
//! use signalboard::{Classification, Classified, RawSignal};
//!
//! let signal: RawSignal = serde_json::from_str(r#"{"id": "api", "value": 0.75}"#).unwrap();
//! assert!(signal.is_warning());
//! assert_eq!(signal.classification(), Classification::Warning);
//! assert_eq!(signal.formatted_value().to_string(), "75");
//! ```
//!
//! ### As a library with the HTTP source
//!
//! ```no_run
//! use signalboard::{App, HttpSource, Route, SignalClient};
//! use signalboard::ui::Theme;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let client = SignalClient::builder()
//!     .endpoint("http://localhost:8080")
//!     .build()
//!     .unwrap();
//! let source = HttpSource::new(client, runtime.handle().clone());
//! let mut app = App::new(Box::new(source), Theme::dark(), Route::Home);
//! app.poll_source();
//! ```
//!
//! ### Fetching directly
//!
//! ```no_run
//! use signalboard::SignalClient;
//!
//! # tokio_test::block_on(async {
//! let client = SignalClient::builder().build().unwrap();
//! let signal = client.fetch_full("api").await.unwrap();
//! println!("{:?}", signal.value);
//! # });
//! ```
//!
//! ### Driving the app from a channel
//!
//! ```
//! use signalboard::source::{Payload, Request};
//! use signalboard::ui::Theme;
//! use signalboard::{App, ChannelSource, Route};
//!
//! let (backend, source) = ChannelSource::create("test");
//! let mut app = App::new(Box::new(source), Theme::dark(), Route::Home);
//!
//! backend.respond(Request::All, Ok(Payload::List(Vec::new())));
//! app.poll_source();
//! assert!(app.home.signals.loaded().is_some());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, LoadState, Route};
pub use config::Settings;
pub use data::{Classification, Classified, RawSignal, SignalView};
pub use source::{ChannelSource, FileSource, HttpSource, SignalClient, SignalSource};
