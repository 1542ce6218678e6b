//! OAuth provider enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity providers supported for third-party login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// GitHub OAuth (also grants repository access scopes).
    Github,
    /// Google OAuth.
    Google,
}

impl Provider {
    /// Return the provider as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Google => "google",
        }
    }

    /// Whether this provider grants elevated scopes whose access token is
    /// kept server-side for proxying provider APIs.
    pub fn retains_access_token(&self) -> bool {
        matches!(self, Self::Github)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "google" => Ok(Self::Google),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Error returned when parsing an unsupported provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown OAuth provider: {}", self.0)
    }
}

impl std::error::Error for UnknownProvider {}
