//! The provider client trait and shared profile type.

use async_trait::async_trait;

use collab_core::config::oauth::OAuthConfig;
use collab_core::error::AppError;
use collab_entity::user::Provider;

/// Identity data resolved from a provider after a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// The provider's stable identity id.
    pub provider_user_id: String,
    /// Primary email, if the provider disclosed one.
    pub email: Option<String>,
    /// Provider login/handle, if any.
    pub login: Option<String>,
    /// Avatar URL, if any.
    pub avatar_url: Option<String>,
    /// The provider access token obtained from the exchange.
    pub access_token: String,
}

/// A provider's token-exchange and profile endpoints.
///
/// Implementations perform the outbound HTTP calls with a bounded
/// timeout; a rejection surfaces the provider's error payload.
#[async_trait]
pub trait OAuthProvider: Send + Sync + 'static {
    /// Which provider this client talks to.
    fn name(&self) -> Provider;

    /// Exchanges a one-time authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, AppError>;

    /// Fetches the identity profile behind an access token.
    ///
    /// Providers that withhold email from the profile endpoint fall
    /// back to their email-listing endpoint internally; `email` stays
    /// `None` only when no usable address exists at all.
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError>;
}

/// Builds the shared HTTP client for provider calls.
pub(crate) fn build_http_client(config: &OAuthConfig) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.http_timeout_seconds))
        .user_agent(concat!("collabvoice/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::with_source(
            collab_core::error::ErrorKind::Upstream,
            "Failed to build OAuth HTTP client",
            e,
        ))
}
