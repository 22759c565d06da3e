// Server module entry point
// Binds the listener and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{AppState, ServerConfig};
use crate::error::ServerError;
use crate::handler::DynamicHandler;
use crate::logger;

pub use listener::create_listener;
pub use signal::shutdown_signal;

/// A bound server, ready to accept connections
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind a pure static server; unmatched paths get the 404 page.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        Self::bind_inner(config, None)
    }

    /// Bind a server that falls back to `handler` when no static file matches
    pub fn bind_with_handler<H>(config: ServerConfig, handler: H) -> Result<Self, ServerError>
    where
        H: DynamicHandler,
    {
        Self::bind_inner(config, Some(Arc::new(handler)))
    }

    fn bind_inner(
        config: ServerConfig,
        handler: Option<Arc<dyn DynamicHandler>>,
    ) -> Result<Self, ServerError> {
        let addr = config.socket_addr()?;
        let listener = create_listener(addr)?;
        let state = Arc::new(AppState::new(config, handler));

        logger::log_server_start(&listener.local_addr()?, &state.config);
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Connections already accepted keep being served by their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::handle_connection(stream, peer_addr, Arc::clone(&self.state));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                },
                () = &mut shutdown => {
                    logger::log_shutdown();
                    return Ok(());
                }
            }
        }
    }
}
