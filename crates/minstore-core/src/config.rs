//! Server configuration.
//!
//! Provides [`ServerConfig`], loaded from `MINSTORE_*` environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// MinStore server configuration.
///
/// # Examples
///
/// ```
/// use minstore_core::config::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.listen, "0.0.0.0:9000");
/// assert_eq!(config.stream_buffer_size, 65_536);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind address (e.g. `"0.0.0.0:9000"`).
    #[builder(default = String::from("0.0.0.0:9000"))]
    pub listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Capacity in bytes of the pipe between the driver and an object download.
    #[builder(default = 65_536)]
    pub stream_buffer_size: usize,

    /// Value of the `Server` response header.
    #[builder(default = String::from("MinStore"))]
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: String::from("0.0.0.0:9000"),
            log_level: String::from("info"),
            stream_buffer_size: 65_536,
            server_name: String::from("MinStore"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `MINSTORE_LISTEN` | `0.0.0.0:9000` |
    /// | `MINSTORE_LOG_LEVEL` | `info` |
    /// | `MINSTORE_STREAM_BUFFER_SIZE` | `65536` |
    /// | `MINSTORE_SERVER_NAME` | `MinStore` |
    ///
    /// Unparsable or zero buffer sizes are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("MINSTORE_LISTEN") {
            config.listen = v;
        }
        if let Some(v) = lookup("MINSTORE_LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("MINSTORE_STREAM_BUFFER_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                if n > 0 {
                    config.stream_buffer_size = n;
                }
            }
        }
        if let Some(v) = lookup("MINSTORE_SERVER_NAME") {
            config.server_name = v;
        }

        config
    }
}
