// Application state module
// Read-only state shared by every request: resolved config, header template, handler

use std::sync::Arc;

use super::types::ServerConfig;
use crate::handler::DynamicHandler;
use crate::http::HeaderPolicy;

/// Application state
pub struct AppState {
    pub config: ServerConfig,
    /// Header template built once at startup
    pub header_policy: HeaderPolicy,
    /// Fallback for requests with no static match
    pub handler: Option<Arc<dyn DynamicHandler>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, handler: Option<Arc<dyn DynamicHandler>>) -> Self {
        let header_policy = HeaderPolicy::new(&config);
        Self {
            config,
            header_policy,
            handler,
        }
    }
}
