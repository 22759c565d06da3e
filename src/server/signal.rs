// Signal handling module
//
// Resolves when the process is asked to stop:
// - SIGINT:  Ctrl+C
// - SIGTERM: Unix only

use crate::logger;

/// Future that completes on Ctrl+C or (on Unix) SIGTERM.
///
/// Pass it to [`super::Server::run_until`] for a graceful stop. If a handler
/// cannot be installed the error is logged and that signal is ignored.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to install Ctrl+C handler: {e}"));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                logger::log_error(&format!("Failed to install SIGTERM handler: {e}"));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
