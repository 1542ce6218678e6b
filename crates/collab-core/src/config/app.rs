//! Server and CORS configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS configuration for the browser frontend.
///
/// The cookie-based token transport is cross-site, so credentialed
/// requests must be allowed for the configured origins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to make credentialed requests.
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods.
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,
    /// Allowed request headers.
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,
    /// Whether to allow cookies on cross-site requests.
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
    /// Preflight cache duration in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u32,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            allow_credentials: true,
            max_age_seconds: default_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_grace() -> u64 {
    10
}

fn default_origins() -> Vec<String> {
    vec![
        "https://collabvoice.vercel.app".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
}

fn default_headers() -> Vec<String> {
    vec!["authorization".to_string(), "content-type".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_max_age() -> u32 {
    3600
}
