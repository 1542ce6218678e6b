//! Integration tests for registration, login, verify and logout.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_index_is_live() {
    let app = TestApp::new();

    let response = app.request("GET", "/", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let body = json!({
        "username": "alice",
        "email": "alice@x.com",
        "password": "hunter2!",
    });
    let response = app.request("POST", "/api/auth/register", Some(body), None).await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["message"], "Registration successful");
    assert_eq!(response.body["user"]["id"], 1);
    assert_eq!(response.body["user"]["username"], "alice");
    assert_eq!(response.body["user"]["email"], "alice@x.com");
    assert_eq!(response.body["user"]["has_github_access"], false);
    assert!(response.body["user"].get("password_hash").is_none());
    assert!(!response.token().is_empty());

    let cookies = response.set_cookies();
    assert!(
        cookies.iter().any(|c| c.starts_with("auth_token=") && c.contains("HttpOnly")),
        "No auth cookie set: {:?}",
        cookies
    );
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "username": "alice" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::new();

    let body = json!({
        "username": "alice",
        "email": "not-an-email",
        "password": "hunter2!",
    });
    let response = app.request("POST", "/api/auth/register", Some(body), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    app.register("alice", "alice@x.com", "hunter2!").await;

    let body = json!({
        "username": "other",
        "email": "ALICE@X.COM",
        "password": "hunter2!",
    });
    let response = app.request("POST", "/api/auth/register", Some(body), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "CONFLICT");
    assert_eq!(response.body["message"], "Email already registered");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new();
    app.register("alice", "alice@x.com", "hunter2!").await;

    let body = json!({
        "username": "alice",
        "email": "other@x.com",
        "password": "hunter2!",
    });
    let response = app.request("POST", "/api/auth/register", Some(body), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "CONFLICT");
    assert_eq!(response.body["message"], "Username already taken");
}

#[tokio::test]
async fn test_login_unknown_email_suggests_signup() {
    let app = TestApp::new();

    let body = json!({ "email": "ghost@x.com", "password": "hunter2!" });
    let response = app.request("POST", "/api/auth/login", Some(body), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["suggest_signup"], true);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.register("alice", "alice@x.com", "hunter2!").await;

    let body = json!({ "email": "alice@x.com", "password": "wrong" });
    let response = app.request("POST", "/api/auth/login", Some(body), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert_eq!(response.body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "alice@x.com" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.register("alice", "alice@x.com", "hunter2!").await;

    let body = json!({ "email": "alice@x.com", "password": "hunter2!" });
    let response = app.request("POST", "/api/auth/login", Some(body), None).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["user"]["username"], "alice");
    assert!(!response.token().is_empty());
}

#[tokio::test]
async fn test_verify_with_bearer_token() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@x.com", "hunter2!").await;

    let response = app
        .request("GET", "/api/auth/verify", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["user"]["username"], "alice");
    assert_eq!(response.body["user"]["email"], "alice@x.com");
}

#[tokio::test]
async fn test_verify_with_cookie() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@x.com", "hunter2!").await;

    let response = app
        .request_with_cookie("GET", "/api/auth/verify", &token)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["user"]["username"], "alice");
}

#[tokio::test]
async fn test_verify_without_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/auth/verify", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_verify_garbage_token() {
    let app = TestApp::new();
    app.register("alice", "alice@x.com", "hunter2!").await;

    let response = app
        .request("GET", "/api/auth/verify", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_logout_invalidates_token_and_clears_cookie() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@x.com", "hunter2!").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "Logged out successfully");

    // Logout was bearer-authenticated, yet the removal cookie must still
    // be sent for clients that hold one from a browser login.
    let cookies = response.set_cookies();
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("auth_token=") && c.contains("Max-Age=0")),
        "No clearing cookie: {:?}",
        cookies
    );

    let verify = app
        .request("GET", "/api/auth/verify", None, Some(&token))
        .await;
    assert_eq!(verify.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_requires_auth() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
