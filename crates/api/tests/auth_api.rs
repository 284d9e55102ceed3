//! HTTP-level integration tests for registration, login and the bearer
//! token extractor.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, login_token, post_json, register_user, TEST_PASSWORD};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_created_user(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "  operator  ", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_i64());
    assert_eq!(json["username"], "operator");
    assert!(json.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_username_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "operator").await;

    let body = serde_json::json!({ "username": "operator", "password": "another-password" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Username already registered");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn weak_credentials_are_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let short_password = serde_json::json!({ "username": "operator", "password": "short" });
    let response = post_json(app.clone(), "/api/v1/auth/register", short_password).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let short_name = serde_json::json!({ "username": " a ", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/register", short_name).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_bearer_token(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let user_id = register_user(app.clone(), "operator").await;

    let body = serde_json::json!({ "username": "operator", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user_id"], user_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_401(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "operator").await;

    let body = serde_json::json!({ "username": "operator", "password": "not-the-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_unknown_user_is_401(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "ghost", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Bearer extractor
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_requires_token(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = common::get(app, "/api/v1/session").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn garbage_token_is_401(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/session", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_of_deleted_user_is_401(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let user_id = register_user(app.clone(), "operator").await;
    let token = login_token(app.clone(), "operator").await;

    sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(app, "/api/v1/session", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "User not found");
}
