//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use khm_api::broadcast::ChannelSubscriber;
use sqlx::SqlitePool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_returns_ok_with_json(pool: SqlitePool) {
    let state = common::test_state(pool);
    let (subscriber, _rx) = ChannelSubscriber::channel("probe", 4);
    state.registry.register(Box::new(subscriber)).await;
    let app = common::build_app_from_state(state);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["subscribers"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "No route for GET /this-route-does-not-exist");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_keeps_request_id(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/api/v1/nope")
        .header("x-request-id", "fixed-id")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-request-id"], "fixed-id");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_x_request_id_header(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36, "x-request-id should be a UUID");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn specs_endpoint_is_public(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/system/specs").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    for field in ["node", "os", "manufacturer", "model", "processor", "ram_total"] {
        assert!(json[field].is_string(), "{field} should be a string");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cors_preflight_allows_dashboard_origin(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/auth/login")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:3000");
}
