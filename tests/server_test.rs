//! HTTP shell tests, driven in-process without a socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use boundary_router::http::{build_router, AppState};
use boundary_router::routing::{DecisionEngine, RefererQueryPolicy};
use boundary_router::table::TableStore;

mod common;

fn app(store: Arc<TableStore>) -> Router {
    let engine = Arc::new(DecisionEngine::new(store, RefererQueryPolicy::Skip));
    build_router(AppState { engine }, Duration::from_secs(5))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_canister_request_is_routed() {
    let uri = format!("/api/v2/canister/{}/query", common::S1_CANISTER);
    let (status, headers, body) = send(app(common::store()), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "N1,S1,application");
    assert_eq!(headers["x-ic-subnet-id"], "S1");
    assert_eq!(headers["x-ic-node-id"], "N1");
    assert_eq!(headers["x-ic-canister-id"], "00000000000000000101");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_alias_host_is_routed() {
    let request = Request::builder()
        .uri("/index.html")
        .header("host", "foo.example.com")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app(common::store()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "N1,S1,application");
}

#[tokio::test]
async fn test_unroutable_request_is_not_found() {
    let uri = format!("/api/v2/canister/{}/query", common::GAP_CANISTER);
    let (status, headers, _) = send(app(common::store()), get(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!headers.contains_key("x-ic-node-id"));
}

#[tokio::test]
async fn test_empty_table_is_unavailable() {
    let uri = format!("/api/v2/canister/{}/query", common::S1_CANISTER);
    let (status, _, _) = send(app(common::empty_store()), get(&uri)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _, _) = send(app(common::empty_store()), get("/_/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _, _) = send(app(common::empty_store()), get("/_/random")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_and_random() {
    let (status, _, body) = send(app(common::store()), get("/_/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _, body) = send(app(common::store()), get("/_/random")).await;
    assert_eq!(status, StatusCode::OK);
    let fields: Vec<&str> = body.split(',').collect();
    assert_eq!(fields.len(), 3);
    assert!(["S1", "S2", "S3"].contains(&fields[0]));
}

#[tokio::test]
async fn test_host_canister_id_probe() {
    let request = Request::builder()
        .uri("/_/host-canister-id")
        .header("host", format!("{}.ic0.app", common::S2_CANISTER))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app(common::store()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, common::S2_CANISTER);

    let request = Request::builder()
        .uri("/_/host-canister-id")
        .header("host", "ic0.app")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app(common::store()), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
