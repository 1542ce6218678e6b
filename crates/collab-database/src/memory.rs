//! In-memory credential store using a Tokio mutex for single-node use.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use collab_core::error::AppError;
use collab_core::result::AppResult;
use collab_entity::user::{NewUser, OAuthLink, Provider, User};

use crate::store::CredentialStore;

/// Internal state for the memory-based credential store.
#[derive(Debug, Default)]
struct InnerState {
    /// Users keyed by id.
    users: HashMap<i64, User>,
    /// Next id to assign.
    next_id: i64,
}

/// In-memory credential store using a Tokio mutex for thread safety.
///
/// Suitable for tests and single-node experiments only; the mutex gives
/// the same atomic read-modify-write guarantee per user record that the
/// Postgres row UPDATE provides.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryCredentialStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;

        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::conflict("Email already registered"));
        }
        if state
            .users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&new_user.username))
        {
            return Err(AppError::conflict("Username already taken"));
        }

        state.next_id += 1;
        let id = state.next_id;

        let (github_id, google_id, avatar_url, github_access_token) = match &new_user.link {
            Some(link) => {
                let (gh, gg) = match link.provider {
                    Provider::Github => (Some(link.provider_user_id.clone()), None),
                    Provider::Google => (None, Some(link.provider_user_id.clone())),
                };
                let token = if link.provider.retains_access_token() {
                    link.access_token.clone()
                } else {
                    None
                };
                (gh, gg, link.avatar_url.clone(), token)
            }
            None => (None, None, new_user.avatar_url.clone(), None),
        };

        let user = User {
            id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            github_id,
            google_id,
            avatar_url,
            github_access_token,
            current_session_id: None,
            created_at: Utc::now(),
        };

        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn set_current_session(&self, user_id: i64, session_id: Option<Uuid>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::user_not_found(format!("No user with id {user_id}")))?;
        user.current_session_id = session_id;
        Ok(())
    }

    async fn link_identity(&self, user_id: i64, link: &OAuthLink) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::user_not_found(format!("No user with id {user_id}")))?;

        match link.provider {
            Provider::Github => {
                if user.github_id.is_none() {
                    user.github_id = Some(link.provider_user_id.clone());
                }
                if link.access_token.is_some() {
                    user.github_access_token = link.access_token.clone();
                }
            }
            Provider::Google => {
                if user.google_id.is_none() {
                    user.google_id = Some(link.provider_user_id.clone());
                }
            }
        }
        if link.avatar_url.is_some() {
            user.avatar_url = link.avatar_url.clone();
        }

        Ok(user.clone())
    }
}
