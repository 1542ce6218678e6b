//! The credential store trait implemented by Postgres and in-memory backends.

use async_trait::async_trait;
use uuid::Uuid;

use collab_core::result::AppResult;
use collab_entity::user::{NewUser, OAuthLink, User};

/// Persistence seam for user identity records and session markers.
///
/// Implementations must apply `set_current_session` as a single atomic
/// read-modify-write on the user row: concurrent logins for the same
/// user resolve last-writer-wins, which is exactly the single-session
/// enforcement contract.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a new user and return the stored record.
    ///
    /// Fails with a conflict error if the username, email, or linked
    /// provider id is already taken.
    async fn create(&self, new_user: &NewUser) -> AppResult<User>;

    /// Overwrite the user's current session marker.
    ///
    /// Passing `None` clears the marker (logout); passing a new id
    /// supersedes every token issued under the previous marker.
    async fn set_current_session(&self, user_id: i64, session_id: Option<Uuid>) -> AppResult<()>;

    /// Attach or refresh a provider identity on an existing user.
    ///
    /// The provider id is backfilled only if not already linked; the
    /// avatar and retained access token are refreshed whenever the
    /// provider reports them. Returns the updated record.
    async fn link_identity(&self, user_id: i64, link: &OAuthLink) -> AppResult<User>;
}
