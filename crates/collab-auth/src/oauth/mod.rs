//! OAuth account linking: provider clients and the linker state machine.

pub mod github;
pub mod google;
pub mod linker;
pub mod provider;

pub use github::GithubOAuthProvider;
pub use google::GoogleOAuthProvider;
pub use linker::{OAuthLinker, OAuthLogin};
pub use provider::{OAuthProvider, ProviderProfile};

use std::collections::HashMap;
use std::sync::Arc;

use collab_core::config::oauth::OAuthConfig;
use collab_core::error::AppError;
use collab_entity::user::Provider;

/// Builds the provider client map from configuration.
///
/// Providers without a config section are simply absent from the map;
/// their login endpoint reports an upstream error.
pub fn providers_from_config(
    config: &OAuthConfig,
) -> Result<HashMap<Provider, Arc<dyn OAuthProvider>>, AppError> {
    let mut providers: HashMap<Provider, Arc<dyn OAuthProvider>> = HashMap::new();

    if let Some(github) = &config.github {
        providers.insert(
            Provider::Github,
            Arc::new(GithubOAuthProvider::new(config, github.clone())?),
        );
    }
    if let Some(google) = &config.google {
        providers.insert(
            Provider::Google,
            Arc::new(GoogleOAuthProvider::new(config, google.clone())?),
        );
    }

    Ok(providers)
}
