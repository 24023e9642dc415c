//! Integration tests for the catalog API (`/api/images`, `/api/upload`).
//!
//! Requests run in-process through the full router; broadcasts are observed
//! by registering a probe display connection directly with the hub.

mod common;

use axum::extract::ws::Message;
use axum::http::StatusCode;
use common::{body_json, delete, get, put_json, upload, TestApp};
use kiosk_api::ws::Channel;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

/// Parse a queued text frame as JSON.
fn frame_json(message: Message) -> Value {
    match message {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("Expected a text frame, got: {other:?}"),
    }
}

/// Register a display probe and consume its `images-list` greeting.
async fn display_probe(app: &TestApp, conn_id: &str) -> UnboundedReceiver<Message> {
    let mut rx = app
        .state
        .hub
        .connect(Channel::Display, conn_id, &app.state.store)
        .await;
    let greeting = frame_json(rx.recv().await.unwrap());
    assert_eq!(greeting["type"], "images-list");
    rx
}

async fn upload_ok(app: &TestApp, filename: &str) -> Value {
    let response = upload(app.app(), "image", filename, b"pretend image bytes").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["image"].clone()
}

// ---------------------------------------------------------------------------
// Test: a fresh catalog lists as an empty array
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_starts_empty() {
    let app = TestApp::new().await;

    let response = get(app.app(), "/api/images").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Test: upload photo.jpg under the limit, then a .exe
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_accepts_image_and_rejects_executable() {
    let app = TestApp::new().await;
    let started = chrono::Utc::now().timestamp_millis();
    let two_mb = vec![0xAB_u8; 2 * 1024 * 1024];

    let response = upload(app.app(), "image", "photo.jpg", &two_mb).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["image"]["title"], "photo");
    assert_eq!(json["image"]["originalName"], "photo.jpg");
    assert_eq!(json["image"]["sizeBytes"], 2 * 1024 * 1024);
    assert!(json["image"]["id"].as_i64().unwrap() >= started);

    let stored = json["image"]["filename"].as_str().unwrap();
    assert!(app.state.store.config().image_path(stored).exists());

    let response = upload(app.app(), "image", "setup.exe", b"MZ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    assert_eq!(app.state.store.len().await, 1);
}

// ---------------------------------------------------------------------------
// Test: oversize uploads are rejected and leave nothing behind
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_over_limit_is_rejected_without_residue() {
    let app = TestApp::new().await;
    let too_big = vec![0_u8; 5 * 1024 * 1024 + 1];

    let response = upload(app.app(), "image", "huge.png", &too_big).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(app.state.store.is_empty().await);

    let leftovers = std::fs::read_dir(&app.state.store.config().images_dir)
        .unwrap()
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn upload_without_image_field_is_bad_request() {
    let app = TestApp::new().await;

    let response = upload(app.app(), "attachment", "photo.jpg", b"bytes").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: upload ids are unique
// ---------------------------------------------------------------------------

#[tokio::test]
async fn consecutive_uploads_get_unique_ids() {
    let app = TestApp::new().await;

    let a = upload_ok(&app, "a.png").await;
    let b = upload_ok(&app, "b.png").await;
    let c = upload_ok(&app, "c.png").await;

    let ids = [a["id"].as_i64(), b["id"].as_i64(), c["id"].as_i64()];
    assert!(ids[0] < ids[1] && ids[1] < ids[2], "ids not increasing: {ids:?}");
}

// ---------------------------------------------------------------------------
// Test: get by id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_returns_record_or_404() {
    let app = TestApp::new().await;
    let image = upload_ok(&app, "menu.webp").await;
    let id = image["id"].as_i64().unwrap();

    let response = get(app.app(), &format!("/api/images/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, image);

    let response = get(app.app(), "/api/images/12345").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Image with id 12345 not found");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request_with_error_body() {
    let app = TestApp::new().await;

    for response in [
        get(app.app(), "/api/images/abc").await,
        put_json(app.app(), "/api/images/abc", r#"{"title":"x"}"#).await,
        delete(app.app(), "/api/images/abc").await,
    ] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json["error"].is_string());
    }
}

// ---------------------------------------------------------------------------
// Test: update merges provided fields only
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_merges_partial_record() {
    let app = TestApp::new().await;
    let image = upload_ok(&app, "specials.jpg").await;
    let id = image["id"].as_i64().unwrap();

    let response = put_json(
        app.app(),
        &format!("/api/images/{id}"),
        r#"{"description":"Tuesday specials","order":9}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["image"]["description"], "Tuesday specials");
    assert_eq!(json["image"]["order"], 9);
    assert_eq!(json["image"]["title"], image["title"]);
    assert_eq!(json["image"]["active"], image["active"]);
    assert!(json["image"]["updatedAt"].is_string());
}

#[tokio::test]
async fn update_rejects_unknown_fields_and_bad_json() {
    let app = TestApp::new().await;
    let image = upload_ok(&app, "x.png").await;
    let uri = format!("/api/images/{}", image["id"]);

    let response = put_json(app.app(), &uri, r#"{"filename":"../../etc/passwd"}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(app.app(), &uri, "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let app = TestApp::new().await;

    let response = put_json(app.app(), "/api/images/77", r#"{"title":"x"}"#).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_after_maximal_order_succeeds() {
    let app = TestApp::new().await;
    let image = upload_ok(&app, "first.png").await;

    let response = put_json(
        app.app(),
        &format!("/api/images/{}", image["id"]),
        r#"{"order":9223372036854775807}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let second = upload_ok(&app, "second.png").await;

    assert_eq!(second["order"], i64::MAX);
    assert_eq!(app.state.store.len().await, 2);
}

// ---------------------------------------------------------------------------
// Test: delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_record() {
    let app = TestApp::new().await;
    let image = upload_ok(&app, "old.png").await;
    let id = image["id"].as_i64().unwrap();

    let response = delete(app.app(), &format!("/api/images/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"success": true}));

    let response = get(app.app(), &format!("/api/images/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_id_is_404_and_catalog_unchanged() {
    let app = TestApp::new().await;
    upload_ok(&app, "keep.png").await;
    let before = app.state.store.list().await;

    let response = delete(app.app(), "/api/images/1").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.state.store.list().await, before);
}

// ---------------------------------------------------------------------------
// Test: every mutation produces exactly one display broadcast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_broadcasts_exactly_one_event() {
    let app = TestApp::new().await;
    let mut rx = display_probe(&app, "probe").await;

    let image = upload_ok(&app, "new.png").await;

    let event = frame_json(rx.recv().await.unwrap());
    assert_eq!(event["type"], "image-uploaded");
    assert_eq!(event["image"], image);
    assert!(rx.try_recv().is_err(), "expected exactly one event");
}

#[tokio::test]
async fn update_and_delete_broadcast_to_displays() {
    let app = TestApp::new().await;
    let image = upload_ok(&app, "promo.png").await;
    let id = image["id"].as_i64().unwrap();
    let mut rx = display_probe(&app, "probe").await;

    put_json(app.app(), &format!("/api/images/{id}"), r#"{"active":false}"#).await;
    let event = frame_json(rx.recv().await.unwrap());
    assert_eq!(event["type"], "image-updated");
    assert_eq!(event["image"]["active"], false);

    delete(app.app(), &format!("/api/images/{id}")).await;
    let event = frame_json(rx.recv().await.unwrap());
    assert_eq!(event, serde_json::json!({"type": "image-deleted", "id": id}));

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn failed_mutations_do_not_broadcast() {
    let app = TestApp::new().await;
    let mut rx = display_probe(&app, "probe").await;

    upload(app.app(), "image", "virus.exe", b"MZ").await;
    delete(app.app(), "/api/images/5").await;

    assert!(rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: uploaded files are served statically
// ---------------------------------------------------------------------------

#[tokio::test]
async fn uploaded_file_is_served_under_uploads() {
    let app = TestApp::new().await;
    let image = upload_ok(&app, "served.png").await;
    let filename = image["filename"].as_str().unwrap();

    let response = get(app.app(), &format!("/uploads/{filename}")).await;

    assert_eq!(response.status(), StatusCode::OK);
}
