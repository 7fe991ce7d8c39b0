//! Channel-based data source.
//!
//! Requests are forwarded to a [`ChannelBackend`] held by the caller, which
//! answers them by pushing completions back. Useful for embedding the
//! dashboard behind another transport, and for driving the app in tests.

use tokio::sync::mpsc;

use super::{Completion, Payload, Request, SignalSource, SourceError};

/// A data source whose requests are answered through a channel.
///
/// # Example
///
/// ```
/// use signalboard::source::{ChannelSource, Payload, Request, SignalSource};
///
/// let (mut backend, mut source) = ChannelSource::create("in-memory");
/// source.request(Request::All);
///
/// let request = backend.next_request().unwrap();
/// backend.respond(request, Ok(Payload::List(vec![])));
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    requests: mpsc::UnboundedSender<Request>,
    completions: mpsc::UnboundedReceiver<Completion>,
    description: String,
}

/// The answering side of a [`ChannelSource`].
#[derive(Debug)]
pub struct ChannelBackend {
    requests: mpsc::UnboundedReceiver<Request>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl ChannelSource {
    /// Create a connected backend/source pair.
    pub fn create(source_description: &str) -> (ChannelBackend, Self) {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let source = Self {
            requests: req_tx,
            completions: done_rx,
            description: format!("channel: {}", source_description),
        };
        let backend = ChannelBackend {
            requests: req_rx,
            completions: done_tx,
        };
        (backend, source)
    }
}

impl ChannelBackend {
    /// Take the next pending request without blocking.
    pub fn next_request(&mut self) -> Option<Request> {
        self.requests.try_recv().ok()
    }

    /// Drain all pending requests.
    pub fn pending_requests(&mut self) -> Vec<Request> {
        std::iter::from_fn(|| self.next_request()).collect()
    }

    /// Wait for the next request.
    pub async fn recv_request(&mut self) -> Option<Request> {
        self.requests.recv().await
    }

    /// Deliver the outcome of `request`. Any request may be answered, in any
    /// order.
    pub fn respond(&self, request: Request, result: Result<Payload, SourceError>) -> bool {
        self.completions.send(Completion { request, result }).is_ok()
    }
}

impl SignalSource for ChannelSource {
    fn request(&mut self, request: Request) {
        // A dropped backend never answers; the view stays in its loading state
        let _ = self.requests.send(request);
    }

    fn poll(&mut self) -> Option<Completion> {
        self.completions.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawSignal;

    #[test]
    fn test_requests_reach_backend() {
        let (mut backend, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");
        assert!(backend.next_request().is_none());

        source.request(Request::All);
        source.request(Request::Full { id: "a".into() });
        assert_eq!(
            backend.pending_requests(),
            vec![Request::All, Request::Full { id: "a".into() }]
        );
    }

    #[test]
    fn test_completions_in_arrival_order() {
        let (backend, mut source) = ChannelSource::create("test");
        assert!(source.poll().is_none());

        // Answered out of request order
        backend.respond(
            Request::Full { id: "b".into() },
            Ok(Payload::Signal(RawSignal::default())),
        );
        backend.respond(Request::All, Err(SourceError::Timeout));

        let first = source.poll().unwrap();
        assert_eq!(first.request, Request::Full { id: "b".into() });
        let second = source.poll().unwrap();
        assert!(matches!(second.result, Err(SourceError::Timeout)));
        assert!(source.poll().is_none());
    }
}
