//! Request handler module
//!
//! Responsible for request dispatch: the static resource probe, the static
//! file path and the dynamic fallback to the caller's handler.

pub mod dynamic;
pub mod listing;
pub mod probe;
pub mod router;
pub mod static_files;

// Re-export main entry points
pub use dynamic::{handler_fn, DynamicHandler, HandlerFn, HandlerFuture, HandlerResult};
pub use router::{dispatch, handle_request, Dispatched, RequestContext, ResponseOutcome};
