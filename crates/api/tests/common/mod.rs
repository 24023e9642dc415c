#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use kiosk_api::config::ServerConfig;
use kiosk_api::router::build_app_router;
use kiosk_api::state::AppState;
use kiosk_store::{ImageStore, StoreConfig};

/// Multipart boundary used by [`multipart_upload`].
pub const BOUNDARY: &str = "kiosk-test-boundary";

/// Build a test `ServerConfig` whose data and public dirs live in `dir`.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    let mut store = StoreConfig::under(dir.path().join("data"));
    store.max_upload_bytes = 5 * 1024 * 1024;

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        public_dir: dir.path().join("public"),
        store,
    }
}

/// A fully wired application over a private temp directory.
///
/// Keep the struct alive for the duration of the test; dropping it removes
/// the directory.
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        std::fs::create_dir_all(&config.public_dir).unwrap();

        let store = ImageStore::open(config.store.clone()).await.unwrap();
        let state = AppState::new(config.clone(), Arc::new(store));
        let router = build_app_router(state.clone(), &config);

        Self { dir, state, router }
    }

    /// A fresh clone of the router, ready for `oneshot`.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Send a request through the router.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// GET `uri`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

/// DELETE `uri`.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// PUT a raw JSON body to `uri`.
pub async fn put_json(app: Router, uri: &str, json: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

/// POST a single-file multipart upload to `/api/upload`.
pub async fn upload(app: Router, field: &str, filename: &str, contents: &[u8]) -> Response<Body> {
    send(app, multipart_upload(field, filename, contents)).await
}

/// Build a multipart request carrying one file field.
pub fn multipart_upload(field: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
