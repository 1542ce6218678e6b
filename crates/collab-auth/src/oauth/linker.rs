//! The OAuth linker — turns an authorization code into a local,
//! authenticated user and delegates to the session authority.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use collab_core::error::AppError;
use collab_database::store::CredentialStore;
use collab_entity::user::{NewUser, OAuthLink, Provider, User};

use crate::session::{SessionAuthority, SessionHandle};

use super::provider::{OAuthProvider, ProviderProfile};

/// Result of a successful OAuth login.
#[derive(Debug, Clone)]
pub struct OAuthLogin {
    /// The resolved (possibly just created) user.
    pub user: User,
    /// The freshly minted session.
    pub session: SessionHandle,
}

/// Exchanges provider codes and resolves local accounts.
///
/// Re-running a login for the same provider identity converges to the
/// same user record: resolution is keyed on email, and provider ids are
/// backfilled once.
pub struct OAuthLinker {
    /// Credential store for user resolution and creation.
    store: Arc<dyn CredentialStore>,
    /// Session authority to mint the session after linking.
    authority: Arc<SessionAuthority>,
    /// Configured provider clients.
    providers: HashMap<Provider, Arc<dyn OAuthProvider>>,
}

impl std::fmt::Debug for OAuthLinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthLinker")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl OAuthLinker {
    /// Creates a linker over the given provider clients.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        authority: Arc<SessionAuthority>,
        providers: HashMap<Provider, Arc<dyn OAuthProvider>>,
    ) -> Self {
        Self {
            store,
            authority,
            providers,
        }
    }

    /// Whether the given provider has a configured client.
    pub fn supports(&self, provider: Provider) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Runs the full OAuth login protocol for one authorization code.
    ///
    /// Exchange the code, fetch the profile, resolve or create the local
    /// user by email, then mint a session.
    pub async fn login(&self, provider: Provider, code: &str) -> Result<OAuthLogin, AppError> {
        let client = self.providers.get(&provider).ok_or_else(|| {
            AppError::upstream(format!("OAuth provider {provider} is not configured"))
        })?;

        let access_token = client.exchange_code(code).await?;
        let profile = client.fetch_profile(&access_token).await?;

        let email = profile
            .email
            .clone()
            .ok_or_else(|| AppError::oauth_profile("Provider disclosed no usable email"))?;

        let link = OAuthLink {
            provider,
            provider_user_id: profile.provider_user_id.clone(),
            avatar_url: profile.avatar_url.clone(),
            access_token: provider
                .retains_access_token()
                .then(|| profile.access_token.clone()),
        };

        let user = match self.store.find_by_email(&email).await? {
            Some(existing) => self.store.link_identity(existing.id, &link).await?,
            None => {
                let username = self.resolve_username(&email, &profile).await?;
                info!(provider = %provider, username = %username, "Creating user from OAuth login");
                self.store
                    .create(&NewUser::from_oauth(username, email, link))
                    .await?
            }
        };

        let session = self.authority.create_session(&user).await?;
        info!(provider = %provider, user_id = user.id, "OAuth login successful");

        // Re-read so the returned record carries the session marker the
        // authority just wrote.
        let user = self
            .store
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::user_not_found("Account vanished during login"))?;

        Ok(OAuthLogin { user, session })
    }

    /// Picks a username for a first-time OAuth user.
    ///
    /// The candidate comes from the email local-part, falling back to the
    /// provider login. If taken, disambiguates deterministically with a
    /// short slice of the provider id.
    async fn resolve_username(
        &self,
        email: &str,
        profile: &ProviderProfile,
    ) -> Result<String, AppError> {
        let base = candidate_username(email, profile.login.as_deref());

        if self.store.find_by_username(&base).await?.is_none() {
            return Ok(base);
        }
        Ok(disambiguate_username(&base, &profile.provider_user_id))
    }
}

/// Derives the base username candidate: email local-part, else login.
fn candidate_username(email: &str, login: Option<&str>) -> String {
    let local_part = email.split('@').next().unwrap_or_default();
    if !local_part.is_empty() {
        return local_part.to_string();
    }
    login.unwrap_or("user").to_string()
}

/// Suffixes the first five characters of the provider id onto a taken
/// base username.
fn disambiguate_username(base: &str, provider_user_id: &str) -> String {
    let slice: String = provider_user_id.chars().take(5).collect();
    format!("{base}_{slice}")
}
