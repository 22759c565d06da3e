// Configuration types module
// Defines the caller-facing options bag and the resolved, immutable server config

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options supplied by the embedding program or loaded from a config file.
///
/// Every field is optional so that "absent" can be told apart from an
/// explicit `false`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServerOptions {
    /// Listening port; `0` asks the OS for a free one (embedding, tests).
    /// The `-p` command-line flag never yields `0`.
    pub port: Option<u16>,
    /// Emit CORS headers (default: true)
    pub cors: Option<bool>,
    /// Render directory listings (default: true)
    pub ls: Option<bool>,
    /// Extra response headers as raw `"Name: value"` strings, in order
    pub headers: Option<Vec<String>>,
    pub host: Option<String>,
    /// Directory served as the static root (default: working directory)
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingOptions,
    #[serde(default)]
    pub performance: PerformanceOptions,
}

/// Logging overrides, all optional
#[derive(Debug, Default, Deserialize, Clone)]
pub struct LoggingOptions {
    pub access_log_format: Option<String>,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

/// Connection tuning overrides, all optional
#[derive(Debug, Default, Deserialize, Clone)]
pub struct PerformanceOptions {
    pub keep_alive: Option<bool>,
    pub request_timeout: Option<u64>,
}

/// Fully resolved server configuration, immutable after startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub root: PathBuf,
    pub cors_enabled: bool,
    pub dir_listing_enabled: bool,
    /// Raw `"Name: value"` header specs in input order
    pub extra_headers: Vec<String>,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Access log format (simple, combined, common, json)
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    pub access_log_file: Option<String>,
    /// Diagnostic log file path (stderr if not set)
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log_format: "simple".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Connection timeout in seconds, 0 disables it
    pub request_timeout: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            request_timeout: 30,
        }
    }
}
