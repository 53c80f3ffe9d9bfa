//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use lightning::http::RouterState;
use lightning::lifecycle::build_state;
use lightning::store::{ContentStore, MemoryStore, StoreError};
use lightning::{HttpServer, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Store double that remembers every key it was asked for.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    lookups: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &'static [u8]) -> Self {
        self.inner.insert(key, Bytes::from_static(value));
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        self.lookups.lock().unwrap().push(key.to_string());
        self.inner.get(key).await
    }
}

/// Store double that fails the test when queried.
#[derive(Debug, Default)]
pub struct ForbiddenStore;

#[async_trait]
impl ContentStore for ForbiddenStore {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        panic!("store must not be queried, got key {key}");
    }
}

/// Build a server with the given project, backend rules and store.
pub fn server_with(project: &str, backends: &[String], store: Arc<dyn ContentStore>) -> HttpServer {
    let mut config = ServerConfig::default();
    config.project = project.to_string();
    config.backends = backends.to_vec();

    let state: RouterState = build_state(&config, store).unwrap();
    HttpServer::new(state)
}

/// Serve `server` on an ephemeral port and return the address.
pub async fn spawn_server(server: HttpServer) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

/// Start an upstream that describes the request it received.
///
/// Responds `201 Created` with `x-upstream: <name>` and a body of
/// newline-separated `field=value` lines.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| async move {
        let header = |key: &str| {
            headers
                .get(key)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };

        let description = format!(
            "upstream={}\nmethod={}\nuri={}\nhost={}\nx-forwarded-host={}\nx-forwarded-for={}\nx-custom={}\nconnection-token={}\nbody={}",
            name,
            method,
            uri,
            header("host"),
            header("x-forwarded-host"),
            header("x-forwarded-for"),
            header("x-custom"),
            header("x-hop"),
            String::from_utf8_lossy(&body),
        );

        (StatusCode::CREATED, [("x-upstream", name)], description).into_response()
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start a raw upstream that accepts `Upgrade: echo` and then echoes bytes.
///
/// Requests without the upgrade header get a `400`.
pub async fn start_upgrade_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let head = read_head(&mut stream).await.to_ascii_lowercase();
                if !head.contains("upgrade: echo") || !head.contains("connection: upgrade") {
                    let _ = stream
                        .write_all(b"HTTP/1.1 400 Bad Request\r\ncontent-length: 0\r\n\r\n")
                        .await;
                    return;
                }

                stream
                    .write_all(b"HTTP/1.1 101 Switching Protocols\r\nconnection: upgrade\r\nupgrade: echo\r\n\r\n")
                    .await
                    .unwrap();

                let mut buf = [0u8; 1024];
                loop {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => {
                            if stream.write_all(&buf[..n]).await.is_err() {
                                return;
                            }
                        }
                    }
                }
            });
        }
    });
    addr
}

/// Read an HTTP/1 message head byte by byte, leaving the stream at the body.
pub async fn read_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        if stream.read(&mut byte).await.unwrap() == 0 {
            break;
        }
        head.push(byte[0]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Parse the echo backend's body into a lookup function.
pub fn field<'a>(description: &'a str, name: &str) -> &'a str {
    description
        .lines()
        .find_map(|line| line.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')))
        .unwrap_or_else(|| panic!("field {name} missing from {description:?}"))
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
