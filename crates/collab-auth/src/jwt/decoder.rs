//! Session token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use collab_core::config::auth::AuthConfig;
use collab_core::error::AppError;

use super::claims::Claims;

/// Validates session token signatures and expiry.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        // The claim set has no registered audience or issuer.
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes a token and checks signature and expiry.
    ///
    /// An expired token fails with a token-expired error; any structural
    /// or signature failure maps to token-malformed.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::token_expired("Token has expired")
                    }
                    _ => AppError::token_malformed(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}
