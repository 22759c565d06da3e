//! Static file serving module
//!
//! Serves a path the probe already found: files with MIME type, `ETag` and
//! Range support, directories through their `index.html` or a generated
//! listing. Every response carries the CORS pair (when enabled) and the
//! configured extra headers.

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};
use std::io;
use std::path::Path;
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Per-request options for the static file path
#[derive(Debug, Clone)]
pub struct StaticOptions {
    pub enable_cors: bool,
    pub show_dir_listing: bool,
    /// Extra headers appended to every static response
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

/// Serve the probed `target` for this request
pub async fn serve(
    ctx: &RequestContext,
    target: &Path,
    options: &StaticOptions,
) -> Response<Full<Bytes>> {
    let mut response = match ctx.method {
        Method::GET | Method::HEAD => serve_target(ctx, target, options).await,
        Method::OPTIONS => http::build_options_response(options.enable_cors),
        _ => http::build_405_response(),
    };
    apply_headers(response.headers_mut(), options);
    response
}

async fn serve_target(
    ctx: &RequestContext,
    target: &Path,
    options: &StaticOptions,
) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(target).await {
        Ok(m) => m,
        Err(e) => return io_error_response(ctx, target, &e),
    };

    if !metadata.is_dir() {
        return serve_file(ctx, target).await;
    }

    if !ctx.path.ends_with('/') {
        let location = match &ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    let index = target.join(INDEX_FILE);
    if fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
        return serve_file(ctx, &index).await;
    }

    if !options.show_dir_listing {
        return error_page(StatusCode::NOT_FOUND, ctx.is_head);
    }

    match listing::read_entries(target).await {
        Ok(entries) => {
            http::response::build_html_response(listing::render(&ctx.path, &entries), ctx.is_head)
        }
        Err(e) => io_error_response(ctx, target, &e),
    }
}

/// Serve a single file with `ETag` and Range support
pub async fn serve_file(ctx: &RequestContext, file_path: &Path) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(file_path).await {
        Ok(m) => m,
        Err(e) => return io_error_response(ctx, file_path, &e),
    };
    let etag = cache::etag_for(&metadata);
    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => return io_error_response(ctx, file_path, &e),
    };
    let content_type = mime::content_type_for(file_path);
    let total_size = content.len();

    match http::resolve_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Partial(range) => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::copy_from_slice(&content[range.start..=range.end])
            };
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                range,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => http::response::build_cached_response(
            Bytes::from(content),
            content_type,
            &etag,
            ctx.is_head,
        ),
    }
}

/// Append CORS and configured headers to a static response
fn apply_headers(headers: &mut HeaderMap, options: &StaticOptions) {
    if options.enable_cors {
        http::headers::append_cors(headers);
    }
    for (name, value) in &options.headers {
        headers.append(name.clone(), value.clone());
    }
}

/// A file can vanish or become unreadable between probe and read
fn io_error_response(ctx: &RequestContext, path: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    if err.kind() == io::ErrorKind::NotFound {
        return error_page(StatusCode::NOT_FOUND, ctx.is_head);
    }
    logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
    error_page(StatusCode::INTERNAL_SERVER_ERROR, ctx.is_head)
}

fn error_page(status: StatusCode, is_head: bool) -> Response<Full<Bytes>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(http::headers::DEFAULT_CONTENT_TYPE),
    );
    http::build_error_page_response(status, headers, is_head)
}
