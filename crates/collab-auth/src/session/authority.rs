//! The session authority — mints and validates session tokens and
//! enforces the single-active-session policy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use collab_core::error::AppError;
use collab_database::store::CredentialStore;
use collab_entity::user::User;

use crate::jwt::{JwtDecoder, JwtEncoder};

/// A minted session: the opaque session id plus the signed bearer token.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionHandle {
    /// The session id persisted as the user's current session marker.
    pub session_id: Uuid,
    /// The signed bearer token held by the client.
    pub token: String,
    /// Token expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Mints session tokens and validates them against the stored marker.
///
/// Stateless between requests: every call reads and writes only the
/// credential store. Revocation is a single overwrite of the per-user
/// session marker; there is no revocation list and no per-token state.
#[derive(Clone)]
pub struct SessionAuthority {
    /// Credential store holding the per-user session marker.
    store: Arc<dyn CredentialStore>,
    /// Token encoder.
    encoder: JwtEncoder,
    /// Token decoder.
    decoder: JwtDecoder,
}

impl std::fmt::Debug for SessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority").finish()
    }
}

impl SessionAuthority {
    /// Creates a new session authority.
    pub fn new(store: Arc<dyn CredentialStore>, encoder: JwtEncoder, decoder: JwtDecoder) -> Self {
        Self {
            store,
            encoder,
            decoder,
        }
    }

    /// Mints a fresh session for the user.
    ///
    /// Generates an unguessable session id, persists it as the user's
    /// current session marker (overwriting any prior value — this is the
    /// revocation point), and signs a token embedding it. Every token
    /// issued under the previous marker is superseded atomically. Under
    /// concurrent logins for the same user the last writer wins.
    pub async fn create_session(&self, user: &User) -> Result<SessionHandle, AppError> {
        let session_id = Uuid::new_v4();

        self.store
            .set_current_session(user.id, Some(session_id))
            .await?;

        let signed = self.encoder.generate_token(user.id, session_id)?;

        info!(user_id = user.id, session_id = %session_id, "Session created");

        Ok(SessionHandle {
            session_id,
            token: signed.token,
            expires_at: signed.expires_at,
        })
    }

    /// Validates a bearer token and resolves its user.
    ///
    /// Checks, in order: signature and expiry, subject existence, and
    /// finally that the token's session id equals the user's current
    /// session marker. A newer login elsewhere therefore invalidates
    /// older tokens even while they are still time-valid.
    pub async fn validate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decoder.decode_token(token)?;

        let user = self
            .store
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::user_not_found("Token subject no longer exists"))?;

        match user.current_session_id {
            Some(current) if current == claims.session_id() => Ok(user),
            _ => Err(AppError::session_superseded(
                "Token belongs to a superseded session",
            )),
        }
    }

    /// Ends the user's current session by clearing the marker.
    ///
    /// Any previously issued token fails validation afterwards.
    pub async fn end_session(&self, user: &User) -> Result<(), AppError> {
        self.store.set_current_session(user.id, None).await?;
        info!(user_id = user.id, "Session ended");
        Ok(())
    }

    /// Invalidates every other outstanding session by minting a new one.
    ///
    /// Identical to [`create_session`](Self::create_session): since only
    /// one session marker exists per user, replacing it revokes all
    /// other tokens as a side effect.
    pub async fn invalidate_others(&self, user: &User) -> Result<SessionHandle, AppError> {
        self.create_session(user).await
    }
}
