//! Dynamic fallback module
//!
//! Runs the caller-supplied handler for requests with no static match and
//! turns its outcome into a response: the handler's own response, the 404
//! page when it produced nothing, or the 500 page when it failed.

use crate::error::HandlerError;
use crate::handler::router::ResponseOutcome;
use crate::http::{self, headers::DEFAULT_CONTENT_TYPE};
use crate::logger;
use futures_util::FutureExt;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

/// What a handler produces: a response, nothing (404), or a failure (500)
pub type HandlerResult = Result<Option<Response<Full<Bytes>>>, HandlerError>;

/// Boxed future returned by [`DynamicHandler::call`]
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>>;

/// Caller-supplied logic for requests that match no static resource.
///
/// `headers` is this request's own copy of the default header template. The
/// handler may change it freely; it is used for the error page when the
/// handler returns `Ok(None)` or fails. A returned response is sent as is.
pub trait DynamicHandler: Send + Sync + 'static {
    fn call<'a>(&'a self, req: Request<Bytes>, headers: &'a mut HeaderMap) -> HandlerFuture<'a>;
}

/// Handler built from a synchronous closure, see [`handler_fn`]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a synchronous closure as a [`DynamicHandler`].
///
/// ```
/// use fallback_server::handler::handler_fn;
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response};
///
/// let hello = handler_fn(|req, _headers| {
///     if req.uri().path() == "/hello" {
///         Ok(Some(Response::new(Full::new(Bytes::from("hi")))))
///     } else {
///         Ok(None)
///     }
/// });
/// # let _ = hello;
/// ```
#[must_use]
pub const fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Bytes>, &mut HeaderMap) -> HandlerResult + Send + Sync + 'static,
{
    HandlerFn { f }
}

impl<F> DynamicHandler for HandlerFn<F>
where
    F: Fn(Request<Bytes>, &mut HeaderMap) -> HandlerResult + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: Request<Bytes>, headers: &'a mut HeaderMap) -> HandlerFuture<'a> {
        // run inside the future so a panic is caught by the dispatcher
        Box::pin(async move { (self.f)(req, headers) })
    }
}

/// Run the handler (if any) and map its outcome to a response.
///
/// A panic inside the handler is treated exactly like a returned error.
pub async fn dispatch(
    handler: Option<&dyn DynamicHandler>,
    req: Request<Bytes>,
    mut headers: HeaderMap,
) -> (Response<Full<Bytes>>, ResponseOutcome) {
    let is_head = req.method() == hyper::Method::HEAD;
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let Some(handler) = handler else {
        return not_found(headers, is_head);
    };

    let result = AssertUnwindSafe(handler.call(req, &mut headers))
        .catch_unwind()
        .await;

    let detail = match result {
        Ok(Ok(Some(response))) => return (response, ResponseOutcome::DynamicServed),
        Ok(Ok(None)) => return not_found(headers, is_head),
        Ok(Err(err)) => err.to_string(),
        Err(panic) => panic_detail(panic.as_ref()),
    };

    logger::log_handler_failure(&method, &path, &detail);
    internal_error(headers, is_head, detail)
}

/// 404 page built on the request's header copy
#[must_use]
pub fn not_found(mut headers: HeaderMap, is_head: bool) -> (Response<Full<Bytes>>, ResponseOutcome) {
    reset_content_type(&mut headers);
    let response = http::build_error_page_response(StatusCode::NOT_FOUND, headers, is_head);
    (response, ResponseOutcome::NotFound)
}

/// 500 page built on the request's header copy; `detail` stays server-side
#[must_use]
pub fn internal_error(
    mut headers: HeaderMap,
    is_head: bool,
    detail: String,
) -> (Response<Full<Bytes>>, ResponseOutcome) {
    reset_content_type(&mut headers);
    let response =
        http::build_error_page_response(StatusCode::INTERNAL_SERVER_ERROR, headers, is_head);
    (response, ResponseOutcome::InternalError(detail))
}

fn reset_content_type(headers: &mut HeaderMap) {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("handler panicked: {message}")
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN;

    fn template() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers
    }

    fn get(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Resolves after yielding once, like a handler waiting on I/O
    struct Pending;

    impl DynamicHandler for Pending {
        fn call<'a>(&'a self, req: Request<Bytes>, headers: &'a mut HeaderMap) -> HandlerFuture<'a> {
            Box::pin(async move {
                tokio::task::yield_now().await;
                headers.insert("x-seen", HeaderValue::from_static("yes"));
                let result: HandlerResult = match req.uri().path() {
                    "/fail" => Err("database unreachable".into()),
                    "/none" => Ok(None),
                    _ => {
                        let mut resp = Response::new(Full::new(Bytes::from("async")));
                        *resp.status_mut() = StatusCode::CREATED;
                        Ok(Some(resp))
                    }
                };
                result
            })
        }
    }

    #[tokio::test]
    async fn test_response_is_returned_verbatim() {
        let handler = handler_fn(|_req, _headers| {
            let mut resp = Response::new(Full::new(Bytes::from("{\"ok\":true}")));
            *resp.status_mut() = StatusCode::ACCEPTED;
            resp.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Ok(Some(resp))
        });

        let (resp, outcome) = dispatch(Some(&handler), get("/api"), template()).await;
        assert_eq!(outcome, ResponseOutcome::DynamicServed);
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(!resp.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
        assert_eq!(body_text(resp).await, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_nothing_returned_is_not_found() {
        let handler = handler_fn(|_req, headers| {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert("x-request-id", HeaderValue::from_static("42"));
            Ok(None)
        });

        let (resp, outcome) = dispatch(Some(&handler), get("/missing"), template()).await;
        assert_eq!(outcome, ResponseOutcome::NotFound);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "text/html");
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "42");
        assert_eq!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert!(body_text(resp).await.contains("Not Found"));
    }

    #[tokio::test]
    async fn test_no_handler_is_not_found() {
        let (resp, outcome) = dispatch(None, get("/anything"), template()).await;
        assert_eq!(outcome, ResponseOutcome::NotFound);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_is_internal_error_without_detail() {
        let handler = handler_fn(|_req, headers| {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
            Err("secret connection string".into())
        });

        let (resp, outcome) = dispatch(Some(&handler), get("/boom"), template()).await;
        assert_eq!(
            outcome,
            ResponseOutcome::InternalError("secret connection string".to_string())
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "text/html");
        let body = body_text(resp).await;
        assert!(body.contains("Internal Server Error"));
        assert!(!body.contains("secret"));
    }

    #[tokio::test]
    async fn test_panic_is_internal_error() {
        let handler = handler_fn(|_req, _headers| panic!("index out of bounds"));

        let (resp, outcome) = dispatch(Some(&handler), get("/panic"), template()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(outcome, ResponseOutcome::InternalError(d) if d.contains("index out of bounds")));
        assert!(!body_text(resp).await.contains("index out of bounds"));
    }

    #[tokio::test]
    async fn test_pending_handler_outcomes() {
        let (resp, outcome) = dispatch(Some(&Pending), get("/ok"), template()).await;
        assert_eq!(outcome, ResponseOutcome::DynamicServed);
        assert_eq!(resp.status(), StatusCode::CREATED);

        let (resp, outcome) = dispatch(Some(&Pending), get("/none"), template()).await;
        assert_eq!(outcome, ResponseOutcome::NotFound);
        assert_eq!(resp.headers().get("x-seen").unwrap(), "yes");

        let (resp, outcome) = dispatch(Some(&Pending), get("/fail"), template()).await;
        assert!(matches!(outcome, ResponseOutcome::InternalError(_)));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_head_error_page_has_no_body() {
        let req = Request::builder()
            .method(hyper::Method::HEAD)
            .uri("/missing")
            .body(Bytes::new())
            .unwrap();
        let (resp, _) = dispatch(None, req, template()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_text(resp).await.is_empty());
    }
}
