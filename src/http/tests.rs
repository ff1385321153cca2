//! HTTP API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::{create_router, AppState};
use crate::queue::{Broker, BrokerConfig};

/// Helper to create a test app with background behaviors disabled.
fn create_test_app() -> Router {
    let config = BrokerConfig {
        priority_count: 3,
        capacity: 16,
        ack_timeout_ms: 0,
        max_retries: 3,
        boost_timeout_ms: 0,
        poll_interval_ms: 10,
    };
    let state: AppState = Arc::new(Broker::new(config));
    create_router(state)
}

async fn post_json(app: &Router, path: &str, body: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_empty(app: &Router, path: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(Request::post(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(app: &Router, path: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_ping() {
    let app = create_test_app();
    let json = post_empty(&app, "/ping").await;
    assert!(json["ok"].as_bool().unwrap());
    assert_eq!(json["data"].as_str().unwrap(), "pong");
}

#[tokio::test]
async fn test_count_empty_broker() {
    let app = create_test_app();
    let json = get_json(&app, "/count").await;
    assert!(json["ok"].as_bool().unwrap());
    assert_eq!(json["data"]["active"].as_u64().unwrap(), 0);
    assert_eq!(json["data"]["failed"].as_u64().unwrap(), 0);
    assert_eq!(json["data"]["free"].as_u64().unwrap(), 16);
    assert_eq!(json["data"]["capacity"].as_u64().unwrap(), 16);
}

#[tokio::test]
async fn test_push_pop_ack_flow() {
    let app = create_test_app();

    let json = post_json(
        &app,
        "/push",
        r#"{"id": "m1", "priority": 0, "payload": {"value": 42}}"#,
    )
    .await;
    assert!(json["ok"].as_bool().unwrap());

    let json = post_empty(&app, "/pop").await;
    assert!(json["ok"].as_bool().unwrap());
    assert_eq!(json["data"]["id"].as_str().unwrap(), "m1");
    assert_eq!(json["data"]["payload"]["value"].as_u64().unwrap(), 42);
    let token = json["data"]["token"].as_u64().unwrap();

    let json = post_json(&app, "/ack", &format!(r#"{{"id": "m1", "token": {token}}}"#)).await;
    assert!(json["ok"].as_bool().unwrap());

    let json = get_json(&app, "/count").await;
    assert_eq!(json["data"]["active"].as_u64().unwrap(), 0);
    assert_eq!(json["data"]["free"].as_u64().unwrap(), 16);
}

#[tokio::test]
async fn test_push_duplicate_reports_error() {
    let app = create_test_app();

    let json = post_json(&app, "/push", r#"{"id": "dup"}"#).await;
    assert!(json["ok"].as_bool().unwrap());

    let json = post_json(&app, "/push", r#"{"id": "dup"}"#).await;
    assert!(!json["ok"].as_bool().unwrap());
    assert!(json["error"].as_str().unwrap().contains("duplicate"));
}

#[tokio::test]
async fn test_push_invalid_priority_reports_error() {
    let app = create_test_app();
    let json = post_json(&app, "/push", r#"{"id": "m", "priority": 9}"#).await;
    assert!(!json["ok"].as_bool().unwrap());
    assert!(json["error"].as_str().unwrap().contains("priority"));
}

#[tokio::test]
async fn test_pop_ack_flow() {
    let app = create_test_app();

    post_json(&app, "/push", r#"{"id": "a"}"#).await;
    post_json(&app, "/push", r#"{"id": "b"}"#).await;

    let json = post_empty(&app, "/pop").await;
    assert_eq!(json["data"]["id"].as_str().unwrap(), "a");
    let token = json["data"]["token"].as_u64().unwrap();

    // Completes "a" and hands out "b" in one request.
    let json = post_json(
        &app,
        "/pop_ack",
        &format!(r#"{{"id": "a", "token": {token}}}"#),
    )
    .await;
    assert!(json["ok"].as_bool().unwrap());
    assert_eq!(json["data"]["id"].as_str().unwrap(), "b");
}

#[tokio::test]
async fn test_ack_with_stale_token_reports_error() {
    let app = create_test_app();

    post_json(&app, "/push", r#"{"id": "m"}"#).await;
    let json = post_empty(&app, "/pop").await;
    let token = json["data"]["token"].as_u64().unwrap();
    let stale = token.wrapping_add(1);

    let json = post_json(&app, "/ack", &format!(r#"{{"id": "m", "token": {stale}}}"#)).await;
    assert!(!json["ok"].as_bool().unwrap());
    assert!(json["error"].as_str().unwrap().contains("token"));
}

#[tokio::test]
async fn test_ack_requeue_over_http() {
    let app = create_test_app();

    post_json(&app, "/push", r#"{"id": "m"}"#).await;
    let json = post_empty(&app, "/pop").await;
    let token = json["data"]["token"].as_u64().unwrap();

    let json = post_json(
        &app,
        "/ack",
        &format!(r#"{{"id": "m", "token": {token}, "requeue": true}}"#),
    )
    .await;
    assert!(json["ok"].as_bool().unwrap());

    let json = post_empty(&app, "/pop").await;
    assert_eq!(json["data"]["id"].as_str().unwrap(), "m");
    assert_ne!(json["data"]["token"].as_u64().unwrap(), token);
}

#[tokio::test]
async fn test_failed_listing_and_erase() {
    // Single timeout sends the message straight to failed.
    let config = BrokerConfig {
        priority_count: 1,
        capacity: 4,
        ack_timeout_ms: 50,
        max_retries: 1,
        boost_timeout_ms: 0,
        poll_interval_ms: 10,
    };
    let state: AppState = Arc::new(Broker::new(config));
    let app = create_router(state);

    post_json(&app, "/push", r#"{"id": "f"}"#).await;
    let _ = post_empty(&app, "/pop").await;
    tokio::time::sleep(std::time::Duration::from_millis(250)).await;

    let json = get_json(&app, "/failed").await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0].as_str().unwrap(), "f");

    let json = post_json(&app, "/failed/erase", r#"{"ids": ["f", "ghost"]}"#).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0].as_str().unwrap(), "f");

    // Idempotent: nothing left to erase.
    let json = post_json(&app, "/failed/erase", r#"{"ids": ["f"]}"#).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
