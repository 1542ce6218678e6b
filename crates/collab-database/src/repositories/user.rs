//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use collab_core::error::{AppError, ErrorKind};
use collab_core::result::AppResult;
use collab_entity::user::{NewUser, OAuthLink, Provider, User};

use crate::store::CredentialStore;

/// PostgreSQL-backed credential store.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let (github_id, google_id, avatar_url, github_access_token) = match &new_user.link {
            Some(link) => {
                let (gh, gg) = match link.provider {
                    Provider::Github => (Some(link.provider_user_id.as_str()), None),
                    Provider::Google => (None, Some(link.provider_user_id.as_str())),
                };
                let token = if link.provider.retains_access_token() {
                    link.access_token.as_deref()
                } else {
                    None
                };
                (gh, gg, link.avatar_url.as_deref(), token)
            }
            None => (None, None, new_user.avatar_url.as_deref(), None),
        };

        sqlx::query_as::<_, User>(
            "INSERT INTO users \
             (username, email, password_hash, github_id, google_id, avatar_url, github_access_token) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(github_id)
        .bind(google_id)
        .bind(avatar_url)
        .bind(github_access_token)
        .fetch_one(&self.pool)
        .await
        .map_err(map_create_error)
    }

    async fn set_current_session(&self, user_id: i64, session_id: Option<Uuid>) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET current_session_id = $2 WHERE id = $1")
            .bind(user_id)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update session marker", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::user_not_found(format!(
                "No user with id {user_id}"
            )));
        }
        Ok(())
    }

    async fn link_identity(&self, user_id: i64, link: &OAuthLink) -> AppResult<User> {
        // Provider id backfills only when unlinked; avatar and retained
        // token refresh on every login.
        let query = match link.provider {
            Provider::Github => {
                "UPDATE users SET \
                 github_id = COALESCE(github_id, $2), \
                 avatar_url = COALESCE($3, avatar_url), \
                 github_access_token = COALESCE($4, github_access_token) \
                 WHERE id = $1 RETURNING *"
            }
            Provider::Google => {
                "UPDATE users SET \
                 google_id = COALESCE(google_id, $2), \
                 avatar_url = COALESCE($3, avatar_url) \
                 WHERE id = $1 RETURNING *"
            }
        };

        let mut q = sqlx::query_as::<_, User>(query)
            .bind(user_id)
            .bind(&link.provider_user_id)
            .bind(&link.avatar_url);
        if link.provider == Provider::Github {
            q = q.bind(&link.access_token);
        }

        q.fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to link provider identity", e)
            })?
            .ok_or_else(|| AppError::user_not_found(format!("No user with id {user_id}")))
    }
}

/// Map an insert failure, translating unique violations into conflicts.
fn map_create_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or_default();
            let message = if constraint.contains("email") {
                "Email already registered"
            } else if constraint.contains("username") {
                "Username already taken"
            } else {
                "Account already exists"
            };
            return AppError::conflict(message);
        }
    }
    AppError::with_source(ErrorKind::Database, "Failed to create user", err)
}
