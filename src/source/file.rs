//! File-based data source.
//!
//! Serves both API shapes from a single JSON file holding an array of
//! signals. Detail requests search the whole tree for a matching id.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Completion, Payload, Request, SignalSource, SourceError};
use crate::data::RawSignal;

/// Read and parse a signal array from `path`.
pub fn load_signals(path: &Path) -> Result<Vec<RawSignal>, SourceError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Depth-first search for the signal with the given id.
pub fn find_signal<'a>(signals: &'a [RawSignal], id: &str) -> Option<&'a RawSignal> {
    for signal in signals {
        if signal.id.as_deref() == Some(id) {
            return Some(signal);
        }
        if let Some(found) = signal.dependencies.as_deref().and_then(|deps| find_signal(deps, id))
        {
            return Some(found);
        }
    }
    None
}

/// A data source that answers requests from a local JSON file.
///
/// The file is re-read on every request, so edits show up on the next
/// refresh.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    completed: VecDeque<Completion>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            completed: VecDeque::new(),
        }
    }

    /// Returns the path being served.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn answer(&self, request: &Request) -> Result<Payload, SourceError> {
        let signals = load_signals(&self.path)?;
        match request {
            Request::All => Ok(Payload::List(signals)),
            Request::Full { id } => find_signal(&signals, id)
                .cloned()
                .map(Payload::Signal)
                .ok_or_else(|| SourceError::NotFound(id.clone())),
        }
    }
}

impl SignalSource for FileSource {
    fn request(&mut self, request: Request) {
        let result = self.answer(&request);
        self.completed.push_back(Completion { request, result });
    }

    fn poll(&mut self) -> Option<Completion> {
        self.completed.pop_front()
    }

    fn description(&self) -> &str {
        &self.description
    }
}
