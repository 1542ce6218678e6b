//! Application state shared across all handlers.

use std::collections::HashMap;
use std::sync::Arc;

use collab_auth::jwt::{JwtDecoder, JwtEncoder};
use collab_auth::oauth::{self, OAuthLinker, OAuthProvider};
use collab_auth::password::PasswordHasher;
use collab_auth::session::SessionAuthority;
use collab_core::config::AppConfig;
use collab_core::error::AppError;
use collab_database::store::CredentialStore;
use collab_entity::user::Provider;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Credential store (Postgres in production, memory in tests).
    pub store: Arc<dyn CredentialStore>,
    /// Password hasher (Argon2).
    pub password_hasher: Arc<PasswordHasher>,
    /// Session authority minting and validating tokens.
    pub session_authority: Arc<SessionAuthority>,
    /// OAuth code-exchange and account linker.
    pub oauth_linker: Arc<OAuthLinker>,
}

impl AppState {
    /// Builds the state with provider clients derived from configuration.
    pub fn new(config: AppConfig, store: Arc<dyn CredentialStore>) -> Result<Self, AppError> {
        let providers = oauth::providers_from_config(&config.oauth)?;
        Ok(Self::with_providers(config, store, providers))
    }

    /// Builds the state with explicit provider clients.
    ///
    /// Used by tests to substitute scripted providers for live HTTP
    /// clients.
    pub fn with_providers(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        providers: HashMap<Provider, Arc<dyn OAuthProvider>>,
    ) -> Self {
        let encoder = JwtEncoder::new(&config.auth);
        let decoder = JwtDecoder::new(&config.auth);
        let session_authority = Arc::new(SessionAuthority::new(
            Arc::clone(&store),
            encoder,
            decoder,
        ));
        let oauth_linker = Arc::new(OAuthLinker::new(
            Arc::clone(&store),
            Arc::clone(&session_authority),
            providers,
        ));

        Self {
            config: Arc::new(config),
            store,
            password_hasher: Arc::new(PasswordHasher::new()),
            session_authority,
            oauth_linker,
        }
    }
}
