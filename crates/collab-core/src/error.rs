//! Unified application error types for CollabVoice.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input validation failed (missing or malformed fields).
    Validation,
    /// A duplicate username or email was submitted.
    Conflict,
    /// The requested account does not exist.
    NotFound,
    /// The supplied password did not match.
    InvalidCredentials,
    /// The bearer token is past its expiry.
    TokenExpired,
    /// The bearer token failed signature or structural checks.
    TokenMalformed,
    /// The token's session id no longer matches the user's current session.
    SessionSuperseded,
    /// The token's subject no longer resolves to a user.
    UserNotFound,
    /// The OAuth provider rejected the token exchange.
    OAuthExchange,
    /// The OAuth provider returned an unusable profile (no email).
    OAuthProfile,
    /// The OAuth provider is unconfigured or unreachable.
    Upstream,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::TokenMalformed => write!(f, "TOKEN_MALFORMED"),
            Self::SessionSuperseded => write!(f, "SESSION_SUPERSEDED"),
            Self::UserNotFound => write!(f, "USER_NOT_FOUND"),
            Self::OAuthExchange => write!(f, "OAUTH_EXCHANGE"),
            Self::OAuthProfile => write!(f, "OAUTH_PROFILE"),
            Self::Upstream => write!(f, "UPSTREAM"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl ErrorKind {
    /// Whether this kind must be collapsed to a generic 401 on the wire.
    ///
    /// Expired, malformed, and superseded tokens are deliberately not
    /// distinguished to the client so session state does not leak.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::TokenExpired
                | Self::TokenMalformed
                | Self::SessionSuperseded
                | Self::UserNotFound
        )
    }
}

/// The unified application error used throughout CollabVoice.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a token-malformed error.
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenMalformed, message)
    }

    /// Create a session-superseded error.
    pub fn session_superseded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionSuperseded, message)
    }

    /// Create a user-not-found error (token subject no longer exists).
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserNotFound, message)
    }

    /// Create an OAuth token-exchange error.
    pub fn oauth_exchange(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OAuthExchange, message)
    }

    /// Create an OAuth incomplete-profile error.
    pub fn oauth_profile(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OAuthProfile, message)
    }

    /// Create an upstream-unavailable error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
