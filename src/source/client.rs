//! Async client for the signal HTTP API.
//!
//! ## Endpoints
//!
//! - `GET {endpoint}/api/signal/all`: every signal, in API order
//! - `GET {endpoint}/api/signal/{id}/full`: one signal with its dependency
//!   tree fully expanded
//!
//! ## Example
//!
//! ```rust,no_run
//! use signalboard::source::SignalClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SignalClient::builder()
//!         .endpoint("http://localhost:8080")
//!         .build()?;
//!
//!     for signal in client.fetch_all().await? {
//!         println!("{:?}: {:?}", signal.name, signal.value);
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;

use super::{Payload, Request, SourceError};
use crate::data::RawSignal;

/// Client for the signal API.
#[derive(Debug, Clone)]
pub struct SignalClient {
    client: Client,
    endpoint: String,
}

impl SignalClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> SignalClientBuilder {
        SignalClientBuilder::default()
    }

    /// Base URL requests are made against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn all_url(&self) -> String {
        format!("{}/api/signal/all", self.endpoint)
    }

    pub fn full_url(&self, id: &str) -> String {
        format!("{}/api/signal/{}/full", self.endpoint, urlencoding::encode(id))
    }

    /// Fetch every signal.
    pub async fn fetch_all(&self) -> Result<Vec<RawSignal>, SourceError> {
        let response = self.client.get(self.all_url()).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let signals: Vec<RawSignal> = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(signals)
    }

    /// Fetch one signal with its full dependency tree.
    pub async fn fetch_full(&self, id: &str) -> Result<RawSignal, SourceError> {
        let response = self.client.get(self.full_url(id)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(id.to_string()));
        }

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let signal: RawSignal = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(signal)
    }

    /// Perform `request` and wrap the result as a [`Payload`].
    pub async fn fetch(&self, request: &Request) -> Result<Payload, SourceError> {
        match request {
            Request::All => self.fetch_all().await.map(Payload::List),
            Request::Full { id } => self.fetch_full(id).await.map(Payload::Signal),
        }
    }
}

/// Builder for SignalClient.
#[derive(Debug, Default)]
pub struct SignalClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl SignalClientBuilder {
    /// Set the API base URL (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SignalClient, SourceError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(SignalClient { client, endpoint })
    }
}
