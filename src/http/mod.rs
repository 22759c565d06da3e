//! HTTP protocol layer module
//!
//! Header policy, response builders and the helpers behind static file
//! serving (MIME types, `ETag` validation, byte ranges, error pages).

pub mod cache;
pub mod error_page;
pub mod headers;
pub mod mime;
pub mod range;
pub mod response;

pub use headers::HeaderPolicy;
pub use range::{resolve_range, ByteRange, RangeOutcome};
pub use response::{
    build_304_response, build_405_response, build_416_response, build_error_page_response,
    build_options_response, build_redirect_response,
};
