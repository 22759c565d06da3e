//! Error types for server startup.
//!
//! Per-request failures never surface here: they are turned into responses
//! by the dispatcher.

use thiserror::Error;

/// Errors that can occur while configuring or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error (binding, log files, signal setup).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration source could not be read or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Host/port pair does not form a socket address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Failure raised by a caller-supplied dynamic handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
