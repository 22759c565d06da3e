//! Response header policy module
//!
//! Builds the default header template once at startup and hands out
//! per-request copies. Also owns the parsed list of configured extra headers
//! used by the static file path.

use crate::config::ServerConfig;
use crate::logger;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};

/// Request headers a cross-origin caller is allowed to send
pub const CORS_ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Range";

/// Content type every dynamic response starts from
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

const CSP_PREFIX: &str = "content-security-policy";

/// Immutable header template shared by all requests
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    template: HeaderMap,
    extra: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderPolicy {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        let extra: Vec<_> = config
            .extra_headers
            .iter()
            .filter_map(|raw| parse_header_spec(raw))
            .collect();

        let mut template = HeaderMap::new();
        template.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        for (name, value) in &extra {
            template.append(name.clone(), value.clone());
        }
        if config.cors_enabled {
            append_cors(&mut template);
        }

        Self { template, extra }
    }

    /// Fresh copy of the default header set for one request
    #[must_use]
    pub fn default_headers(&self) -> HeaderMap {
        self.template.clone()
    }

    /// Configured extra headers for a static response.
    ///
    /// With `exempt_csp` set, every `content-security-policy*` entry is left out.
    #[must_use]
    pub fn static_headers(&self, exempt_csp: bool) -> Vec<(HeaderName, HeaderValue)> {
        self.extra
            .iter()
            .filter(|(name, _)| !(exempt_csp && is_csp(name)))
            .cloned()
            .collect()
    }
}

/// Append the CORS header pair
pub fn append_cors(headers: &mut HeaderMap) {
    headers.append(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.append(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

/// Parse a raw `"Name: value"` header spec.
///
/// Only the first colon separates name from value, so values may contain
/// colons. Entries whose name or value cannot be represented are skipped
/// with a warning.
#[must_use]
pub fn parse_header_spec(raw: &str) -> Option<(HeaderName, HeaderValue)> {
    let (name, value) = raw.split_once(':').unwrap_or((raw, ""));
    let name = name.trim();

    let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
        logger::log_warning(&format!("Ignoring header with invalid name: '{raw}'"));
        return None;
    };
    let Ok(header_value) = HeaderValue::from_str(value.trim()) else {
        logger::log_warning(&format!("Ignoring header with invalid value: '{raw}'"));
        return None;
    };

    Some((header_name, header_value))
}

/// Header names are stored lowercase, so this is a case-insensitive match
fn is_csp(name: &HeaderName) -> bool {
    name.as_str().starts_with(CSP_PREFIX)
}
