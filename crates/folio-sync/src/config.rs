//! RON-driven sync configuration.
//!
//! ```ron
//! (
//!     api_base: "https://api.example.com",
//!     request_timeout_ms: 5000,
//! )
//! ```
//!
//! Every field is optional; missing ones fall back to [`crate::constants`].
//! `FOLIO_API` in the environment wins over whatever the file says.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::constants::{
    API_BASE_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_USER_AGENT,
};

/// Errors that can occur when loading sync configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid api_base {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Where and how pages are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the remote store; pages live under `{api_base}/pages/{id}`.
    pub api_base: String,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SyncConfig {
    /// Parse a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = ron::from_str(text)?;
        config.api_url()?;
        Ok(config)
    }

    /// Load from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// `$XDG_CONFIG_HOME/folio/sync.ron` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolve the effective configuration.
    ///
    /// Lookup order:
    /// 1. `explicit` path (must exist)
    /// 2. [`default_path`](Self::default_path), if the file exists
    /// 3. built-in defaults
    ///
    /// Then `FOLIO_API` overrides `api_base`.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    tracing::debug!("Loading sync config from {}", path.display());
                    Self::load(&path)?
                }
                None => Self::default(),
            },
        };
        let config = config.with_api_override(std::env::var(API_BASE_ENV).ok());
        config.api_url()?;
        Ok(config)
    }

    /// Replace `api_base` when an override is present and non-empty.
    pub fn with_api_override(mut self, api_base: Option<String>) -> Self {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            tracing::debug!("api_base overridden by {API_BASE_ENV}: {base}");
            self.api_base = base;
        }
        self
    }

    /// Parsed, validated `api_base`.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_base).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_base.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: self.api_base.clone(),
                reason: "not a base URL".to_string(),
            });
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
