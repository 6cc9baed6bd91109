//! Sync configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

use std::time::Duration;

/// Default remote store base URL for local development.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Environment variable that overrides the configured API base.
pub const API_BASE_ENV: &str = "FOLIO_API";

/// Timeout for a single `PUT /pages/{id}` round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent sent with every persistence call.
pub const DEFAULT_USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Config directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "folio";

/// Sync config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "sync.ron";
