//! Response builders
//!
//! Status responses shared by the static file path and the dynamic
//! fallback. A builder that fails (invalid header value) is logged and
//! replaced by a bare response with the same body.

use super::error_page;
use super::range::ByteRange;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, ACCEPT_RANGES, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_MAX_AGE, ALLOW,
    CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LOCATION,
};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

/// Methods the static file path answers
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

const CACHE_POLICY: &str = "public, max-age=3600";
const PLAIN_TEXT: &str = "text/plain";

fn finish(builder: Builder, body: Bytes) -> Response<Full<Bytes>> {
    match builder.body(Full::new(body.clone())) {
        Ok(response) => response,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(body))
        }
    }
}

/// Empty the body of a HEAD response, keeping the declared length
fn payload(data: Bytes, is_head: bool) -> Bytes {
    if is_head {
        Bytes::new()
    } else {
        data
    }
}

#[must_use]
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, CACHE_POLICY);
    finish(builder, Bytes::new())
}

/// 405 with the `Allow` list
#[must_use]
pub fn build_405_response() -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, PLAIN_TEXT)
        .header(ALLOW, ALLOWED_METHODS);
    finish(builder, Bytes::from_static(b"405 Method Not Allowed"))
}

/// 204 answer to OPTIONS; preflight headers only when CORS is on
#[must_use]
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);
    if enable_cors {
        builder = builder
            .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
            .header(ACCESS_CONTROL_MAX_AGE, "86400");
    }
    finish(builder, Bytes::new())
}

#[must_use]
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, PLAIN_TEXT)
        .header(CONTENT_RANGE, format!("bytes */{file_size}"));
    finish(builder, Bytes::from_static(b"Range Not Satisfiable"))
}

/// 302 to `target`
#[must_use]
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, PLAIN_TEXT);
    finish(builder, Bytes::from_static(b"Redirecting..."))
}

/// 200 with a generated HTML page
#[must_use]
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content.len());
    finish(builder, payload(Bytes::from(content), is_head))
}

/// Build a rendered error page carrying the given headers.
///
/// Used for the custom 404 and 500 pages. The caller decides the header
/// set; only `Content-Length` is set here.
#[must_use]
pub fn build_error_page_response(
    status: StatusCode,
    mut headers: HeaderMap,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let message = if status == StatusCode::NOT_FOUND {
        error_page::NOT_FOUND
    } else {
        error_page::INTERNAL_SERVER_ERROR
    };
    let page = error_page::render(message);
    headers.insert(CONTENT_LENGTH, page.len().into());

    let mut response = Response::new(Full::new(payload(Bytes::from(page), is_head)));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// 200 for a whole file, revalidatable through its `ETag`
#[must_use]
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, data.len())
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, CACHE_POLICY);
    finish(builder, payload(data, is_head))
}

/// 206 for one byte range of a file of `total_size` bytes
#[must_use]
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    range: ByteRange,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.content_length())
        .header(
            CONTENT_RANGE,
            format!("bytes {}-{}/{total_size}", range.start, range.end),
        )
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, CACHE_POLICY);
    finish(builder, payload(data, is_head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_error_page_keeps_given_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "text/html".parse().unwrap());
        headers.insert("x-trace", "abc".parse().unwrap());

        let resp = build_error_page_response(StatusCode::NOT_FOUND, headers, false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get("x-trace").unwrap(), "abc");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from(error_page::render(error_page::NOT_FOUND)));
    }

    #[tokio::test]
    async fn test_error_page_head_has_length_but_no_body() {
        let resp =
            build_error_page_response(StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new(), true);
        let expected = error_page::render(error_page::INTERNAL_SERVER_ERROR).len();
        assert_eq!(
            resp.headers().get(CONTENT_LENGTH).unwrap(),
            &expected.to_string()
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_options_response() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().contains_key("access-control-allow-methods"));

        let resp = build_options_response(false);
        assert!(!resp.headers().contains_key("access-control-allow-methods"));
    }
}
