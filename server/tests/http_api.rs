//! The HTTP boundary, exercised through the router without a socket.

mod common;

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use common::{TASK_ID, fixture, task};
use server::http::{self, AppState};
use server::storage::FileStorage;

async fn app() -> (common::Fixture, axum::Router) {
    let fx = fixture().await;
    let state = AppState::new(
        Arc::new(server::Orchestrator::new(
            fx.storage.clone(),
            Arc::new(server::TaskRegistry::new(vec![task()]).unwrap()),
        )),
        fx.storage.clone(),
    );
    let router = http::router(state);
    (fx, router)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn task_descriptor_is_served() {
    let (_fx, app) = app().await;

    let response = app.oneshot(get(&format!("/api/task/{TASK_ID}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], TASK_ID);
    assert_eq!(body["aggregator"], "fedasync");
    assert_eq!(body["modelVersion"], 0);
    assert_eq!(
        body["uris"]["model"],
        format!("/download/{TASK_ID}/model.onnx")
    );
}

#[tokio::test]
async fn unknown_task_maps_to_404() {
    let (_fx, app) = app().await;

    let response = app.oneshot(get("/api/task/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "task_not_found");
}

#[tokio::test]
async fn update_round_trip_reports_new_version() {
    let (_fx, app) = app().await;

    let request = post_json(
        "/api/update",
        json!({
            "taskId": TASK_ID,
            "clientId": "client-1",
            "update": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            "modelVersion": 0,
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["modelVersion"], 1);
}

#[tokio::test]
async fn bad_update_length_maps_to_500_with_kind() {
    let (_fx, app) = app().await;

    let request = post_json(
        "/api/update",
        json!({
            "taskId": TASK_ID,
            "clientId": "client-1",
            "update": [1.0],
            "modelVersion": 0,
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "length_mismatch");
}

#[tokio::test]
async fn download_serves_stored_bytes() {
    let (fx, app) = app().await;

    let stored = fx.storage.read(&task().files.model).await.unwrap();
    let response = app
        .oneshot(get(&format!("/download/{TASK_ID}/model.onnx")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.as_ref(), stored.as_slice());
}

#[tokio::test]
async fn missing_download_maps_to_404() {
    let (_fx, app) = app().await;
    let response = app.oneshot(get("/download/nope.bin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_acknowledges_the_client() {
    let (_fx, app) = app().await;

    let response = app
        .oneshot(post_json("/api/register", json!({ "clientId": "client-9" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("client-9"));
}
