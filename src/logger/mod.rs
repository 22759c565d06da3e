//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server startup logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, LogFormat};

use crate::config::{LoggingConfig, ServerConfig};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to the diagnostic log
fn write_diagnostic(message: &str) {
    match writer::get() {
        Some(w) => w.write_diagnostic(message),
        None => eprintln!("{message}"),
    }
}

/// Write to the access log
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &ServerConfig) {
    write_diagnostic(&format!("[INFO] Serving {}", config.root.display()));
    write_diagnostic(&format!("[INFO] Listening on: http://{addr}"));
    write_diagnostic(&format!(
        "[INFO] CORS: {}, directory listing: {}",
        on_off(config.cors_enabled),
        on_off(config.dir_listing_enabled)
    ));
    if let Some(ref path) = config.logging.access_log_file {
        write_diagnostic(&format!("[INFO] Access log: {path}"));
    }
}

pub fn log_shutdown() {
    write_diagnostic("[INFO] Shutdown requested, no longer accepting connections");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_diagnostic(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_diagnostic(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_diagnostic(&format!("[WARN] {message}"));
}

/// Record a dynamic handler failure; the detail never reaches the client
pub fn log_handler_failure(method: &str, path: &str, detail: &str) {
    write_diagnostic(&format!("[ERROR] Handler failed for {method} {path}: {detail}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

const fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
