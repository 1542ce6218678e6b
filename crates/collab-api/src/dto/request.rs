//! Request DTOs.
//!
//! Fields arrive as options so missing keys surface as a 400 with a
//! clear message instead of a body-rejection.

use serde::{Deserialize, Serialize};

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Password login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// OAuth login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthRequest {
    /// One-time authorization code from the provider consent flow.
    pub code: Option<String>,
}
