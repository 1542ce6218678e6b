//! # collab-auth
//!
//! Authentication core for CollabVoice: token issuance and validation,
//! single-session enforcement, and OAuth account linking.
//!
//! ## Modules
//!
//! - `jwt` — session token creation and validation
//! - `password` — Argon2id password hashing
//! - `session` — the session authority (mint, validate, supersede)
//! - `oauth` — provider clients and the account linker

pub mod jwt;
pub mod oauth;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use oauth::{OAuthLinker, OAuthProvider, ProviderProfile};
pub use password::PasswordHasher;
pub use session::{SessionAuthority, SessionHandle};
