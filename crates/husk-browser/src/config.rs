//! Client configuration.

use husk_common::net::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings of a [`WebClient`](crate::WebClient).
///
/// Every field is optional in JSON; missing fields take their default.
///
/// ```json
/// { "javascript_enabled": false, "timeout_secs": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientOptions {
    /// Install a script host in every loaded page.
    pub javascript_enabled: bool,
    /// `User-Agent` header for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Frames nested deeper than this are loaded as `about:blank`.
    pub max_frame_depth: usize,
    /// Surface script errors to the caller instead of logging them.
    pub throw_on_script_error: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            javascript_enabled: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_frame_depth: 8,
            throw_on_script_error: true,
        }
    }
}

impl ClientOptions {
    /// Parse options from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Options for the HTTP layer.
    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
