//! HTTP data source.
//!
//! Each request is spawned as its own task on a tokio runtime and reports
//! back over an mpsc channel. Requests are single-shot: no retries, no
//! de-duplication, and completions are delivered in the order they finish.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Completion, Request, SignalClient, SignalSource};

/// A source backed by the signal HTTP API.
///
/// # Example
///
/// ```no_run
/// use signalboard::source::{HttpSource, SignalClient};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let client = SignalClient::builder().endpoint("http://localhost:8080").build().unwrap();
/// let source = HttpSource::new(client, rt.handle().clone());
/// ```
#[derive(Debug)]
pub struct HttpSource {
    client: SignalClient,
    runtime: Handle,
    sender: mpsc::Sender<Completion>,
    receiver: mpsc::Receiver<Completion>,
    tasks: Vec<JoinHandle<()>>,
    description: String,
}

impl HttpSource {
    /// Create a source that spawns its requests on `runtime`.
    pub fn new(client: SignalClient, runtime: Handle) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        let description = format!("http: {}", client.endpoint());
        Self {
            client,
            runtime,
            sender,
            receiver,
            tasks: Vec::new(),
            description,
        }
    }

    /// Number of requests still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }
}

impl SignalSource for HttpSource {
    fn request(&mut self, request: Request) {
        self.tasks.retain(|t| !t.is_finished());

        let client = self.client.clone();
        let tx = self.sender.clone();

        debug!(%request, "spawning fetch");
        let task = self.runtime.spawn(async move {
            let result = client.fetch(&request).await;
            match result {
                Ok(_) => debug!(%request, "fetch finished"),
                Err(ref e) => warn!(%request, error = %e, "fetch failed"),
            }
            // Receiver dropped means the app is gone
            let _ = tx.send(Completion { request, result }).await;
        });
        self.tasks.push(task);
    }

    fn poll(&mut self) -> Option<Completion> {
        // Try to receive without blocking
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}
