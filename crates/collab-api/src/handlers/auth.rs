//! Auth handlers — register, login, OAuth login, verify, logout,
//! invalidate-others.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::ValidateEmail;

use collab_auth::session::SessionHandle;
use collab_core::error::AppError;
use collab_entity::user::{NewUser, Provider, User};

use crate::dto::request::{LoginRequest, OAuthRequest, RegisterRequest};
use crate::dto::response::{AuthResponse, MessageResponse, UserResponse, VerifyResponse};
use crate::error::{ApiError, ApiErrorResponse};
use crate::extractors::auth::{AUTH_COOKIE, AuthUser};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let (username, email, password) = match (req.username, req.email, req.password) {
        (Some(u), Some(e), Some(p)) if !u.is_empty() && !e.is_empty() && !p.is_empty() => (u, e, p),
        _ => return Err(AppError::validation("Missing required fields").into()),
    };

    if !email.validate_email() {
        return Err(AppError::validation("Invalid email format").into());
    }

    if state.store.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("Email already registered").into());
    }
    if state.store.find_by_username(&username).await?.is_some() {
        return Err(AppError::conflict("Username already taken").into());
    }

    let password_hash = state.password_hasher.hash_password(&password)?;
    let user = state
        .store
        .create(&NewUser::with_password(username, email, password_hash))
        .await?;

    let session = state.session_authority.create_session(&user).await?;

    Ok(session_response(
        StatusCode::CREATED,
        jar,
        "Registration successful",
        &user,
        &session,
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (email, password) = match (req.email, req.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(AppError::validation("Missing email or password").into()),
    };

    let Some(user) = state.store.find_by_email(&email).await? else {
        // The frontend offers signup when the account does not exist.
        let body = ApiErrorResponse {
            error: "NOT_FOUND".to_string(),
            message: "User not found".to_string(),
            suggest_signup: Some(true),
        };
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };

    let valid = state
        .password_hasher
        .verify_optional(&password, user.password_hash.as_deref())?;
    if !valid {
        return Err(AppError::invalid_credentials("Invalid credentials").into());
    }

    let session = state.session_authority.create_session(&user).await?;

    Ok(session_response(
        StatusCode::OK,
        jar,
        "Login successful",
        &user,
        &session,
    ))
}

/// POST /api/auth/oauth/{provider}
pub async fn oauth_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
    Json(req): Json<OAuthRequest>,
) -> Result<Response, ApiError> {
    let provider: Provider = provider
        .parse()
        .map_err(|e| AppError::validation(format!("{e}")))?;

    let code = match req.code {
        Some(code) if !code.is_empty() => code,
        _ => return Err(AppError::validation("Missing authorization code").into()),
    };

    let result = state.oauth_linker.login(provider, &code).await?;

    Ok(session_response(
        StatusCode::OK,
        jar,
        format!("Logged in via {provider}"),
        &result.user,
        &result.session,
    ))
}

/// GET /api/auth/verify
pub async fn verify(auth: AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        user: UserResponse::from(auth.user()),
    })
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
) -> Result<Response, ApiError> {
    state.session_authority.end_session(auth.user()).await?;

    // Always send the removal cookie; a bearer-authenticated client may
    // still hold a stale cookie from an earlier browser login.
    let jar = jar.add(clearing_cookie());
    let body = MessageResponse {
        message: "Logged out successfully".to_string(),
    };
    Ok((StatusCode::OK, jar, Json(body)).into_response())
}

/// POST /api/auth/sessions/invalidate-others
pub async fn invalidate_others(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
) -> Result<Response, ApiError> {
    let session = state
        .session_authority
        .invalidate_others(auth.user())
        .await?;

    Ok(session_response(
        StatusCode::OK,
        jar,
        "Other sessions invalidated",
        auth.user(),
        &session,
    ))
}

/// Builds the standard session response: body with user + token, and
/// the auth cookie set on the jar.
fn session_response(
    status: StatusCode,
    jar: CookieJar,
    message: impl Into<String>,
    user: &User,
    session: &SessionHandle,
) -> Response {
    let jar = jar.add(auth_cookie(session.token.clone()));
    let body = AuthResponse {
        message: message.into(),
        user: UserResponse::from(user),
        token: session.token.clone(),
    };
    (status, jar, Json(body)).into_response()
}

/// The HTTP-only session cookie. SameSite=None because the frontend is
/// served from a different origin than the API.
fn auth_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build()
}

/// An expired copy of the auth cookie, overwriting it on the client.
fn clearing_cookie() -> Cookie<'static> {
    let mut cookie = auth_cookie(String::new());
    cookie.make_removal();
    cookie
}
