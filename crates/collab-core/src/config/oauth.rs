//! OAuth provider configuration.

use serde::{Deserialize, Serialize};

/// OAuth settings for all supported providers.
///
/// A provider with no configuration section is treated as unconfigured
/// and its login endpoint answers with an upstream error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// GitHub OAuth application settings.
    pub github: Option<ProviderConfig>,
    /// Google OAuth application settings.
    pub google: Option<ProviderConfig>,
    /// Timeout for outbound provider calls, in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

/// Per-provider OAuth application credentials and endpoints.
///
/// The endpoint URLs default to the provider's public API and are
/// overridable so tests can point at a local stub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OAuth application client id.
    pub client_id: String,
    /// OAuth application client secret.
    pub client_secret: String,
    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
    /// Token-exchange endpoint override.
    pub token_url: Option<String>,
    /// Profile endpoint override.
    pub profile_url: Option<String>,
    /// Secondary email-listing endpoint override (GitHub).
    pub emails_url: Option<String>,
}

fn default_http_timeout() -> u64 {
    10
}
