//! User domain entities.

pub mod model;
pub mod provider;

pub use model::{NewUser, OAuthLink, User};
pub use provider::Provider;
