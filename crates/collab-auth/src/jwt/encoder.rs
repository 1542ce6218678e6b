//! Session token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use collab_core::config::auth::AuthConfig;
use collab_core::error::AppError;

use super::claims::Claims;

/// Creates signed session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Session token TTL in days.
    token_ttl_days: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("token_ttl_days", &self.token_ttl_days)
            .finish()
    }
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SignedToken {
    /// The encoded JWT.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_days: config.token_ttl_days as i64,
        }
    }

    /// Generates a session token binding the user to the given session id.
    pub fn generate_token(&self, user_id: i64, session_id: Uuid) -> Result<SignedToken, AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::days(self.token_ttl_days);

        let claims = Claims {
            sub: user_id,
            sid: session_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(SignedToken {
            token,
            expires_at: exp,
        })
    }
}
