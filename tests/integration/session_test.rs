//! Integration tests for single-session enforcement.
//!
//! Each user has at most one live session: every new login replaces
//! the previous session marker, so older tokens stop validating even
//! though they are still cryptographically sound.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_second_login_supersedes_first() {
    let app = TestApp::new();
    app.register("alice", "alice@x.com", "hunter2!").await;

    let first = app.login("alice@x.com", "hunter2!").await;
    let second = app.login("alice@x.com", "hunter2!").await;
    assert_ne!(first, second);

    let stale = app
        .request("GET", "/api/auth/verify", None, Some(&first))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.body["error"], "UNAUTHORIZED");

    let live = app
        .request("GET", "/api/auth/verify", None, Some(&second))
        .await;
    assert_eq!(live.status, StatusCode::OK, "{:?}", live.body);
}

#[tokio::test]
async fn test_sessions_are_isolated_per_user() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@x.com", "hunter2!").await;
    let bob = app.register("bob", "bob@x.com", "hunter2!").await;

    // Bob logging in again must not disturb Alice's session.
    app.login("bob@x.com", "hunter2!").await;

    let alice_verify = app
        .request("GET", "/api/auth/verify", None, Some(&alice))
        .await;
    assert_eq!(alice_verify.status, StatusCode::OK);

    let bob_stale = app
        .request("GET", "/api/auth/verify", None, Some(&bob))
        .await;
    assert_eq!(bob_stale.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalidate_others_rotates_session() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@x.com", "hunter2!").await;

    let response = app
        .request(
            "POST",
            "/api/auth/sessions/invalidate-others",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "Other sessions invalidated");

    let fresh = response.token();
    assert_ne!(fresh, token);

    let stale = app
        .request("GET", "/api/auth/verify", None, Some(&token))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let live = app
        .request("GET", "/api/auth/verify", None, Some(&fresh))
        .await;
    assert_eq!(live.status, StatusCode::OK, "{:?}", live.body);
}

#[tokio::test]
async fn test_invalidate_others_requires_auth() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/auth/sessions/invalidate-others", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_marker_is_rejected() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@x.com", "hunter2!").await;

    app.request("POST", "/api/auth/logout", None, Some(&token))
        .await;

    // The marker is gone but the token is still well-formed and unexpired.
    let response = app
        .request("GET", "/api/auth/verify", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

/// The full lifecycle: register, fail a login, log in twice, and watch
/// the first token die when the second login lands.
#[tokio::test]
async fn test_full_session_lifecycle() {
    let app = TestApp::new();

    let register = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "alice",
                "email": "alice@x.com",
                "password": "hunter2!",
            })),
            None,
        )
        .await;
    assert_eq!(register.status, StatusCode::CREATED);
    assert_eq!(register.body["user"]["id"], 1);

    let bad_login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "alice@x.com", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(bad_login.status, StatusCode::UNAUTHORIZED);

    let first = app.login("alice@x.com", "hunter2!").await;
    let verify_first = app
        .request("GET", "/api/auth/verify", None, Some(&first))
        .await;
    assert_eq!(verify_first.status, StatusCode::OK);

    let second = app.login("alice@x.com", "hunter2!").await;

    let stale = app
        .request("GET", "/api/auth/verify", None, Some(&first))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let live = app
        .request("GET", "/api/auth/verify", None, Some(&second))
        .await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body["user"]["username"], "alice");
}
