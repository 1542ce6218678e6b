//! `AuthUser` extractor — the protected-route interceptor.
//!
//! Pulls the bearer token from the Authorization header or the
//! `auth_token` cookie, runs the full validation chain against the
//! session authority, and either injects the resolved user into the
//! handler or short-circuits with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use collab_core::error::AppError;
use collab_entity::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the session token for browser clients.
pub const AUTH_COOKIE: &str = "auth_token";

/// Extracted authenticated user available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    /// Returns the inner user.
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::token_malformed("Missing bearer token"))?;

        let user = state.session_authority.validate(&token).await?;

        Ok(AuthUser(user))
    }
}

/// Extracts the token from the Authorization header, falling back to
/// the auth cookie.
fn bearer_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    if from_header.is_some() {
        return from_header;
    }

    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
}
