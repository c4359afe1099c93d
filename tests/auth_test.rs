mod common;

use http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_returns_user_without_secret() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "password": "password123",
                "firstName": "Alice",
                "email": "alice@example.com"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::read_json(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["firstName"], "Alice");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    common::create_test_user(&pool, "alice").await;

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "password": "password123",
                "firstName": "Alice"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    // no second row was created
    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users WHERE username = 'alice'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_register_invalid_payload_reports_fields() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            json!({"username": "al", "password": "123", "firstName": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::read_json(response).await;
    assert_eq!(body["message"], "Invalid user data");
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["password"].is_array());
    assert!(body["errors"]["firstName"].is_array());
}

#[tokio::test]
async fn test_login_valid_credentials() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    common::create_test_user(&pool, "alice").await;

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    common::create_test_user(&pool, "alice").await;

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": "wrongpassword"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user_unauthorized() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "ghost", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_missing_fields_bad_request() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
