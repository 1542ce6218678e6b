//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::provider::Provider;

/// A registered user in the CollabVoice system.
///
/// `current_session_id` is the single stored session marker: the only
/// session whose tokens validate. `None` means no session is valid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash. `None` for OAuth-only accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// GitHub identity id, unique when present.
    pub github_id: Option<String>,
    /// Google identity id, unique when present.
    pub google_id: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// GitHub access token kept for repository-API proxying.
    #[serde(skip_serializing)]
    pub github_access_token: Option<String>,
    /// The currently valid session id, or `None` if logged out.
    pub current_session_id: Option<Uuid>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The provider identity id linked for the given provider, if any.
    pub fn provider_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Github => self.github_id.as_deref(),
            Provider::Google => self.google_id.as_deref(),
        }
    }

    /// Whether a GitHub access token is on record for this user.
    pub fn has_github_access(&self) -> bool {
        self.github_access_token.is_some()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password. `None` for OAuth-created accounts.
    pub password_hash: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Provider identity linked at creation, if created via OAuth.
    pub link: Option<OAuthLink>,
}

impl NewUser {
    /// A new password-registered user.
    pub fn with_password(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: Some(password_hash.into()),
            avatar_url: None,
            link: None,
        }
    }

    /// A new OAuth-created user with no password hash.
    pub fn from_oauth(
        username: impl Into<String>,
        email: impl Into<String>,
        link: OAuthLink,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: None,
            avatar_url: None,
            link: Some(link),
        }
    }
}

/// A provider identity to attach to a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthLink {
    /// Which provider this identity belongs to.
    pub provider: Provider,
    /// The provider's stable identity id.
    pub provider_user_id: String,
    /// Avatar URL reported by the provider.
    pub avatar_url: Option<String>,
    /// Provider access token to retain, when the provider grants
    /// elevated scopes.
    pub access_token: Option<String>,
}
