//! GitHub OAuth provider client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use collab_core::config::oauth::{OAuthConfig, ProviderConfig};
use collab_core::error::AppError;
use collab_entity::user::Provider;

use super::provider::{OAuthProvider, ProviderProfile, build_http_client};

const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const PROFILE_URL: &str = "https://api.github.com/user";
const EMAILS_URL: &str = "https://api.github.com/user/emails";

/// Client for GitHub's OAuth token and profile endpoints.
///
/// GitHub grants repository scopes, so the access token obtained here is
/// retained on the user record for later API proxying.
#[derive(Debug, Clone)]
pub struct GithubOAuthProvider {
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
struct GithubUser {
    id: i64,
    login: String,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

impl GithubOAuthProvider {
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

    fn emails_url(&self) -> &str {
        self.config.emails_url.as_deref().unwrap_or(EMAILS_URL)
    }

    /// GitHub withholds email for users with private addresses; the
    /// emails endpoint lists them all. Pick the primary verified entry,
    /// else the first listed.
    async fn fetch_fallback_email(&self, access_token: &str) -> Result<Option<String>, AppError> {
        let response = self
            .client
            .get(self.emails_url())
            .bearer_auth(access_token)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| AppError::oauth_profile(format!("GitHub emails request failed: {e}")))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "GitHub emails endpoint rejected request");
            return Ok(None);
        }

        let emails: Vec<GithubEmail> = response
            .json()
            .await
            .map_err(|e| AppError::oauth_profile(format!("Malformed GitHub emails payload: {e}")))?;

        Ok(emails
            .iter()
            .find(|e| e.primary && e.verified)
            .or_else(|| emails.first())
            .map(|e| e.email.clone()))
    }
}

#[async_trait]
impl OAuthProvider for GithubOAuthProvider {
    fn name(&self) -> Provider {
        Provider::Github
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.token_url())
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::oauth_exchange(format!("GitHub token exchange failed: {e}")))?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::oauth_exchange(format!("Malformed GitHub token payload: {e}")))?;

        if let Some(error) = body.error {
            let description = body.error_description.unwrap_or_default();
            return Err(AppError::oauth_exchange(format!(
                "GitHub rejected the authorization code: {error} {description}"
            )));
        }

        body.access_token
            .ok_or_else(|| AppError::oauth_exchange("GitHub returned no access token"))
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .client
            .get(self.profile_url())
            .bearer_auth(access_token)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| AppError::oauth_profile(format!("GitHub profile request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::oauth_profile(format!(
                "GitHub profile endpoint returned {}",
                response.status()
            )));
        }

        let user: GithubUser = response
            .json()
            .await
            .map_err(|e| AppError::oauth_profile(format!("Malformed GitHub profile: {e}")))?;

        let email = match user.email {
            Some(email) => Some(email),
            None => self.fetch_fallback_email(access_token).await?,
        };

        Ok(ProviderProfile {
            provider_user_id: user.id.to_string(),
            email,
            login: Some(user.login),
            avatar_url: user.avatar_url,
            access_token: access_token.to_string(),
        })
    }
}
