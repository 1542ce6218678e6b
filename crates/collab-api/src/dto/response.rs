//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use collab_entity::user::User;

/// Public user representation. Never carries the password hash or the
/// stored provider access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Whether a GitHub access token is on record.
    pub has_github_access: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            has_github_access: user.has_github_access(),
            created_at: user.created_at,
        }
    }
}

/// Body returned by register, login, OAuth login, and
/// invalidate-others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The authenticated user.
    pub user: UserResponse,
    /// The session bearer token.
    pub token: String,
}

/// Body returned by the verify endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// The authenticated user.
    pub user: UserResponse,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Human-readable detail.
    pub message: String,
}
