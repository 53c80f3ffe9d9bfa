//! Store-path dispatch: key resolution and response contract.

use std::sync::Arc;

use axum::body::to_bytes;
use axum::http::{header, StatusCode};
use tower::ServiceExt;

mod common;

use common::{get, server_with, RecordingStore};

const PAGE: &[u8] = b"<!doctype html><h1>current</h1>";

#[tokio::test]
async fn test_default_key_is_current_content() {
    let store = Arc::new(RecordingStore::new().with("site:index:current-content", PAGE));
    let app = server_with("site", &[], store.clone()).router();

    let res = app.oneshot(get("/any/path?page=3")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "text/html");
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], PAGE);
    assert_eq!(store.lookups(), vec!["site:index:current-content"]);
}

#[tokio::test]
async fn test_index_key_override() {
    let store = Arc::new(RecordingStore::new().with("blog:index:draft-7", b"<p>draft</p>"));
    let app = server_with("blog", &[], store.clone()).router();

    let res = app.oneshot(get("/?index_key=draft-7")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"<p>draft</p>");
    assert_eq!(store.lookups(), vec!["blog:index:draft-7"]);
}

#[tokio::test]
async fn test_empty_index_key_uses_default() {
    let store = Arc::new(RecordingStore::new().with("site:index:current-content", PAGE));
    let app = server_with("site", &[], store.clone()).router();

    let res = app.oneshot(get("/?index_key=")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.lookups(), vec!["site:index:current-content"]);
}

#[tokio::test]
async fn test_missing_key_is_500_with_empty_body() {
    let store = Arc::new(RecordingStore::new());
    let app = server_with("site", &[], store.clone()).router();

    let res = app.oneshot(get("/?index_key=gone")).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_ne!(
        res.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(&b"text/html"[..])
    );
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
    assert_eq!(store.lookups(), vec!["site:index:gone"]);
}

#[tokio::test]
async fn test_content_is_relayed_byte_for_byte() {
    let raw: &'static [u8] = b"\xef\xbb\xbf<p>caf\xc3\xa9 &amp; {{ not a template }}</p>\r\n\x00\xff";
    let store = Arc::new(RecordingStore::new().with("site:index:current-content", raw));
    let app = server_with("site", &[], store).router();

    let res = app.oneshot(get("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], raw);
}

#[tokio::test]
async fn test_any_method_is_served_from_store() {
    let store = Arc::new(RecordingStore::new().with("site:index:current-content", PAGE));
    let app = server_with("site", &[], store.clone()).router();

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/form")
        .body(axum::body::Body::from("ignored"))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.lookups().len(), 1);
}

#[tokio::test]
async fn test_unmatched_path_skips_backends() {
    let store = Arc::new(RecordingStore::new().with("site:index:current-content", PAGE));
    let backends = vec![format!("/api:{}", common::closed_addr())];
    let app = server_with("site", &backends, store.clone()).router();

    let res = app.oneshot(get("/about?index_key=")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.lookups(), vec!["site:index:current-content"]);
}

#[tokio::test]
async fn test_concurrent_requests_do_not_interfere() {
    let store = Arc::new(
        RecordingStore::new()
            .with("site:index:a", b"content-a")
            .with("site:index:b", b"content-b"),
    );
    let app = server_with("site", &[], store.clone()).router();

    let mut handles = Vec::new();
    for i in 0..64 {
        let app = app.clone();
        let name = if i % 2 == 0 { "a" } else { "b" };
        handles.push(tokio::spawn(async move {
            let res = app
                .oneshot(get(&format!("/?index_key={}", name)))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            (name, body)
        }));
    }

    for handle in handles {
        let (name, body) = handle.await.unwrap();
        assert_eq!(body, format!("content-{}", name).as_bytes());
    }
    assert_eq!(store.lookups().len(), 64);
}
