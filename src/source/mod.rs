//! Signal source abstraction.
//!
//! A [`SignalSource`] accepts fetch requests without blocking and hands back
//! completions as they arrive. The application polls it once per frame.
//!
//! - [`HttpSource`]: the signal API over HTTP, via [`SignalClient`]
//! - [`FileSource`]: a local JSON file with the same shapes, for offline use
//! - [`ChannelSource`]: completions pushed by the caller (tests, embedding)

mod channel;
mod client;
mod error;
mod file;
mod http;

pub use channel::{ChannelBackend, ChannelSource};
pub use client::{SignalClient, SignalClientBuilder};
pub use error::SourceError;
pub use file::{find_signal, load_signals, FileSource};
pub use http::HttpSource;

use std::fmt::{self, Debug};

use crate::data::RawSignal;

/// A single fetch against the signal API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `GET /api/signal/all`
    All,
    /// `GET /api/signal/{id}/full`
    Full { id: String },
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::All => f.write_str("all signals"),
            Request::Full { id } => write!(f, "signal {}", id),
        }
    }
}

/// Data returned for a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    List(Vec<RawSignal>),
    Signal(RawSignal),
}

/// A finished request and its outcome.
#[derive(Debug)]
pub struct Completion {
    pub request: Request,
    pub result: Result<Payload, SourceError>,
}

/// Trait for fetching signals from various backends.
///
/// # Example
///
/// ```
/// use signalboard::source::{FileSource, Request, SignalSource};
///
/// let mut source = FileSource::new("signals.json");
/// source.request(Request::All);
/// if let Some(done) = source.poll() {
///     println!("{} finished: ok={}", done.request, done.result.is_ok());
/// }
/// ```
pub trait SignalSource: Send + Debug {
    /// Start a fetch. Must not block; the result arrives through [`poll`].
    ///
    /// [`poll`]: SignalSource::poll
    fn request(&mut self, request: Request);

    /// Take the next completed request, if any, in arrival order.
    fn poll(&mut self) -> Option<Completion>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Release background work. Called once on teardown.
    fn shutdown(&mut self) {}
}
