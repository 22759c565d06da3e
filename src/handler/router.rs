//! Request dispatch module
//!
//! Entry point for HTTP request processing: probes the filesystem, serves
//! static content or falls back to the dynamic handler, and writes exactly
//! one access log line once the final status is known.

use crate::config::AppState;
use crate::handler::probe::{self, Probe};
use crate::handler::{dynamic, static_files};
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{IF_NONE_MATCH, RANGE, REFERER, USER_AGENT};
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// How a request was answered; exactly one per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// A file or directory under the root answered
    StaticServed,
    /// The dynamic handler returned its own response
    DynamicServed,
    /// The dynamic handler produced nothing (or none is configured)
    NotFound,
    /// The dynamic handler failed; the detail is never sent to the client
    InternalError(String),
}

/// A response together with the path that produced it
#[derive(Debug)]
pub struct Dispatched {
    pub response: Response<Full<Bytes>>,
    pub outcome: ResponseOutcome,
}

/// Read-only view of the request used by routing and the static path
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw (still percent-encoded) URL path
    pub path: String,
    /// Query string without `?`, `None` when absent or empty
    pub query: Option<String>,
    /// Always `None`: request targets never carry a fragment on the wire
    pub fragment: Option<String>,
    /// Userinfo present in an absolute-form target
    pub has_credentials: bool,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

impl RequestContext {
    #[must_use]
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();
        Self {
            method: req.method().clone(),
            path: uri.path().to_string(),
            query: uri.query().filter(|q| !q.is_empty()).map(ToString::to_string),
            fragment: None,
            has_credentials: uri.authority().is_some_and(|a| a.as_str().contains('@')),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_string(req.headers(), &IF_NONE_MATCH),
            range_header: header_string(req.headers(), &RANGE),
        }
    }

    /// Plain GET of an `.html`/`.htm` page with no query, fragment or
    /// credentials. Such pages are served without content-security-policy
    /// headers.
    #[must_use]
    pub fn is_safe_html(&self) -> bool {
        self.method == Method::GET
            && self.query.is_none()
            && self.fragment.as_deref().unwrap_or_default().is_empty()
            && !self.has_credentials
            && has_html_extension(&self.path)
    }
}

fn has_html_extension(path: &str) -> bool {
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm")
    })
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Display,
{
    let format = &state.config.logging.access_log_format;
    let response = respond(req, &state, remote_addr, |entry| {
        logger::log_access(entry, format);
    })
    .await;
    Ok(response)
}

/// Dispatch `req` and hand exactly one access entry to `log` once the
/// final status is known
async fn respond<B, L>(
    req: Request<B>,
    state: &AppState,
    remote_addr: Option<SocketAddr>,
    log: L,
) -> Response<Full<Bytes>>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Display,
    L: FnOnce(&AccessLogEntry) + Send,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        req.method().to_string(),
        req.uri().path().to_string(),
        0,
    );
    entry.remote_addr = remote_addr.map_or_else(|| "-".to_string(), |a| a.ip().to_string());
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_string(req.headers(), &REFERER);
    entry.user_agent = header_string(req.headers(), &USER_AGENT);

    let Dispatched { response, .. } = dispatch(req, state).await;

    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    log(&entry);

    response
}

/// Route one request to the static or the dynamic path
pub async fn dispatch<B>(req: Request<B>, state: &AppState) -> Dispatched
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Display,
{
    let config = &state.config;
    let ctx = RequestContext::from_request(&req);

    match probe::probe(&config.root, &ctx.path, config.dir_listing_enabled).await {
        Probe::Found(target) => {
            let options = static_files::StaticOptions {
                enable_cors: config.cors_enabled,
                show_dir_listing: config.dir_listing_enabled,
                headers: state.header_policy.static_headers(ctx.is_safe_html()),
            };
            Dispatched {
                response: static_files::serve(&ctx, &target, &options).await,
                outcome: ResponseOutcome::StaticServed,
            }
        }
        Probe::Missing => {
            let headers = state.header_policy.default_headers();
            let (parts, body) = req.into_parts();

            let (response, outcome) = match body.collect().await {
                Ok(collected) => {
                    let req = Request::from_parts(parts, collected.to_bytes());
                    dynamic::dispatch(state.handler.as_deref(), req, headers).await
                }
                Err(e) => {
                    let detail = format!("failed to read request body: {e}");
                    logger::log_handler_failure(parts.method.as_str(), parts.uri.path(), &detail);
                    dynamic::internal_error(headers, ctx.is_head, detail)
                }
            };
            Dispatched { response, outcome }
        }
    }
}

fn header_string(headers: &HeaderMap, name: &hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
