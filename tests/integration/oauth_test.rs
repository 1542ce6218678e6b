//! Integration tests for OAuth login and account linking.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::{TestApp, github_profile};

fn oauth_body() -> serde_json::Value {
    json!({ "code": "good-code" })
}

#[tokio::test]
async fn test_oauth_login_creates_user() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));

    let response = app
        .request("POST", "/api/auth/oauth/github", Some(oauth_body()), None)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "Logged in via github");
    assert_eq!(response.body["user"]["username"], "alice");
    assert_eq!(response.body["user"]["email"], "alice@x.com");
    assert_eq!(response.body["user"]["has_github_access"], true);
    assert!(!response.token().is_empty());
}

#[tokio::test]
async fn test_oauth_token_authenticates_verify() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));

    let login = app
        .request("POST", "/api/auth/oauth/github", Some(oauth_body()), None)
        .await;
    let token = login.token();

    let verify = app
        .request("GET", "/api/auth/verify", None, Some(&token))
        .await;
    assert_eq!(verify.status, StatusCode::OK, "{:?}", verify.body);
    assert_eq!(verify.body["user"]["username"], "alice");
}

#[tokio::test]
async fn test_oauth_links_existing_account_by_email() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));
    app.register("alice", "alice@x.com", "hunter2!").await;

    let response = app
        .request("POST", "/api/auth/oauth/github", Some(oauth_body()), None)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["user"]["id"], 1);
    assert_eq!(response.body["user"]["username"], "alice");
    assert_eq!(response.body["user"]["has_github_access"], true);

    // The linked account keeps its password.
    let token = app.login("alice@x.com", "hunter2!").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_oauth_username_collision_gets_suffix() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@other.com")));
    app.register("alice", "alice@x.com", "hunter2!").await;

    let response = app
        .request("POST", "/api/auth/oauth/github", Some(oauth_body()), None)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["user"]["username"], "alice_77889");
}

#[tokio::test]
async fn test_oauth_user_cannot_login_with_password() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));
    app.request("POST", "/api/auth/oauth/github", Some(oauth_body()), None)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "alice@x.com", "password": "anything" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_oauth_missing_code() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));

    let response = app
        .request("POST", "/api/auth/oauth/github", Some(json!({})), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_oauth_rejected_code() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));

    let response = app
        .request(
            "POST",
            "/api/auth/oauth/github",
            Some(json!({ "code": "expired-code" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "OAUTH_EXCHANGE_FAILED");
}

#[tokio::test]
async fn test_oauth_profile_without_email() {
    let app = TestApp::with_github(github_profile("778899", None));

    let response = app
        .request("POST", "/api/auth/oauth/github", Some(oauth_body()), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "OAUTH_PROFILE_INCOMPLETE");
}

#[tokio::test]
async fn test_oauth_unknown_provider() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));

    let response = app
        .request("POST", "/api/auth/oauth/gitlab", Some(oauth_body()), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_oauth_unconfigured_provider() {
    // Only GitHub is wired up; Google has no client.
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));

    let response = app
        .request("POST", "/api/auth/oauth/google", Some(oauth_body()), None)
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn test_oauth_login_replaces_previous_session() {
    let app = TestApp::with_github(github_profile("778899", Some("alice@x.com")));
    let password_token = app.register("alice", "alice@x.com", "hunter2!").await;

    let oauth_login = app
        .request("POST", "/api/auth/oauth/github", Some(oauth_body()), None)
        .await;
    assert_eq!(oauth_login.status, StatusCode::OK);

    let stale = app
        .request("GET", "/api/auth/verify", None, Some(&password_token))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
}
