//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// The JWT secret is a process-wide value injected at construction into
/// the token encoder and decoder, never read per-request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token TTL in days.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u64,
    /// Clock-skew leeway for expiry checks, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_days: default_token_ttl_days(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl_days() -> u64 {
    7
}

fn default_leeway() -> u64 {
    5
}
