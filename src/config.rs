//! Layered settings.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `signalboard.toml` in the working directory
//!    when present)
//! 3. `SIGNALBOARD_*` environment variables (e.g. `SIGNALBOARD_BASE_URL`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! base_url = "http://status.internal:8080"
//! timeout_secs = 5
//! theme = "dark"
//! log_file = "/tmp/signalboard.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "SIGNALBOARD";

/// Colour theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Detect from the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

/// Runtime settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the signal API.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    pub theme: ThemeChoice,
    /// Write tracing output here. Logging is off when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
            theme: ThemeChoice::Auto,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from `path` (required if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Like [`Settings::load`] with a custom environment prefix.
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("signalboard").required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .context("failed to read configuration")?;

        let settings: Settings = config.try_deserialize().context("invalid configuration")?;
        settings.validate().context("invalid configuration")?;
        Ok(settings)
    }

    /// Check values the deserializer cannot.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.timeout_secs > 0, "timeout_secs must be at least 1");
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
