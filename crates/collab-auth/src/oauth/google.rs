//! Google OAuth provider client.

use async_trait::async_trait;
use serde::Deserialize;

use collab_core::config::oauth::{OAuthConfig, ProviderConfig};
use collab_core::error::AppError;
use collab_entity::user::Provider;

use super::provider::{OAuthProvider, ProviderProfile, build_http_client};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const PROFILE_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Client for Google's OAuth token and userinfo endpoints.
#[derive(Debug, Clone)]
pub struct GoogleOAuthProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUser {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleOAuthProvider {
    /// Creates a client from the provider section of the OAuth config.
    pub fn new(oauth: &OAuthConfig, config: ProviderConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: build_http_client(oauth)?,
            config,
        })
    }

    fn token_url(&self) -> &str {
        self.config.token_url.as_deref().unwrap_or(TOKEN_URL)
    }

    fn profile_url(&self) -> &str {
        self.config.profile_url.as_deref().unwrap_or(PROFILE_URL)
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn name(&self) -> Provider {
        Provider::Google
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.token_url())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::oauth_exchange(format!("Google token exchange failed: {e}")))?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::oauth_exchange(format!("Malformed Google token payload: {e}")))?;

        if let Some(error) = body.error {
            let description = body.error_description.unwrap_or_default();
            return Err(AppError::oauth_exchange(format!(
                "Google rejected the authorization code: {error} {description}"
            )));
        }

        body.access_token
            .ok_or_else(|| AppError::oauth_exchange("Google returned no access token"))
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .client
            .get(self.profile_url())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::oauth_profile(format!("Google profile request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::oauth_profile(format!(
                "Google userinfo endpoint returned {}",
                response.status()
            )));
        }

        let user: GoogleUser = response
            .json()
            .await
            .map_err(|e| AppError::oauth_profile(format!("Malformed Google profile: {e}")))?;

        Ok(ProviderProfile {
            provider_user_id: user.id,
            email: user.email,
            login: user.name,
            avatar_url: user.picture,
            access_token: access_token.to_string(),
        })
    }
}
