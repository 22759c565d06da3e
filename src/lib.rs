//! A small HTTP server that serves files from a root directory and hands
//! every request it cannot satisfy to a caller-supplied handler.
//!
//! ```no_run
//! use fallback_server::{handler_fn, Server, ServerConfig, ServerOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::resolve(ServerOptions::default(), std::env::args().skip(1));
//! let api = handler_fn(|_req, _headers| Ok(None));
//! Server::bind_with_handler(config, api)?.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{ServerConfig, ServerOptions};
pub use error::{HandlerError, ServerError};
pub use handler::{handler_fn, DynamicHandler, HandlerFuture, HandlerResult};
pub use server::Server;
