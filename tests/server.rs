use std::net::SocketAddr;

use fallback_server::{handler_fn, Server, ServerConfig, ServerOptions};
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

struct Running {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
    _root: tempfile::TempDir,
}

impl Running {
    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await.unwrap();
    }
}

async fn start(with_handler: bool) -> Running {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::write(root.path().join("style.css"), "body{}").unwrap();

    let options = ServerOptions {
        port: Some(0),
        root: Some(root.path().to_path_buf()),
        headers: Some(vec!["X-Frame-Options: DENY".to_string()]),
        ..ServerOptions::default()
    };
    let config = ServerConfig::resolve(options, Vec::<String>::new());

    let server = if with_handler {
        let api = handler_fn(|req, headers| match req.uri().path() {
            "/api/echo" => {
                let mut resp = Response::new(Full::new(req.into_body()));
                resp.headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Ok(Some(resp))
            }
            "/api/fail" => Err("backend offline".into()),
            _ => {
                headers.insert("x-handled", HeaderValue::from_static("no"));
                Ok(None)
            }
        });
        Server::bind_with_handler(config, api).unwrap()
    } else {
        Server::bind(config).unwrap()
    };

    let addr = server.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        server
            .run_until(async {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });

    Running {
        addr,
        stop: Some(tx),
        task,
        _root: root,
    }
}

/// Send one raw HTTP/1.1 request and return (status, head, body)
async fn send(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).to_string();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let status = head.split(' ').nth(1).unwrap().parse().unwrap();
    (status, head.to_ascii_lowercase(), body.to_string())
}

#[tokio::test]
async fn test_static_files_are_served_without_handler() {
    let server = start(true).await;

    let (status, head, body) = send(server.addr, "GET", "/", "").await;
    assert_eq!(status, StatusCode::OK.as_u16());
    assert_eq!(body, "<h1>home</h1>");
    assert!(head.contains("access-control-allow-origin: *"));
    assert!(head.contains("x-frame-options: deny"));

    let (status, head, _) = send(server.addr, "GET", "/style.css", "").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: text/css"));

    server.stop().await;
}

#[tokio::test]
async fn test_dynamic_handler_receives_body() {
    let server = start(true).await;

    let (status, head, body) = send(server.addr, "POST", "/api/echo", "{\"n\":1}").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: application/json"));
    assert_eq!(body, "{\"n\":1}");

    server.stop().await;
}

#[tokio::test]
async fn test_unhandled_path_gets_not_found_page() {
    let server = start(true).await;

    let (status, head, body) = send(server.addr, "GET", "/nothing/here", "").await;
    assert_eq!(status, 404);
    assert!(head.contains("content-type: text/html"));
    assert!(head.contains("x-handled: no"));
    assert!(body.contains("Not Found"));

    server.stop().await;
}

#[tokio::test]
async fn test_handler_failure_gets_error_page() {
    let server = start(true).await;

    let (status, _, body) = send(server.addr, "GET", "/api/fail", "").await;
    assert_eq!(status, 500);
    assert!(body.contains("Internal Server Error"));
    assert!(!body.contains("backend offline"));

    // the server keeps serving after a failure
    let (status, _, _) = send(server.addr, "GET", "/", "").await;
    assert_eq!(status, 200);

    server.stop().await;
}

#[tokio::test]
async fn test_static_only_server() {
    let server = start(false).await;

    let (status, _, _) = send(server.addr, "GET", "/api/echo", "").await;
    assert_eq!(status, 404);
    let (status, _, _) = send(server.addr, "GET", "/index.html", "").await;
    assert_eq!(status, 200);

    server.stop().await;
}

#[tokio::test]
async fn test_traversal_is_not_served() {
    let server = start(true).await;

    let (status, _, body) = send(server.addr, "GET", "/../../etc/passwd", "").await;
    assert_eq!(status, 404);
    assert!(!body.contains("root:"));

    server.stop().await;
}
