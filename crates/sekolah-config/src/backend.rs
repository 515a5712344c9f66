//! REST backend configuration.
//!
//! # Configuration
//!
//! - `SEKOLAH_API_URL`: base URL of the backend (default: `http://localhost:8000`)
//! - `SEKOLAH_API_TOKEN`: bearer token sent with every request (default: none)
//! - `SEKOLAH_API_TIMEOUT_SECS`: per-request timeout in seconds (default: 10)

use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without trailing slash; endpoint paths start with `/v1/`.
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Self {
        let base_url = env::var("SEKOLAH_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_token = env::var("SEKOLAH_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let timeout_secs = env::var("SEKOLAH_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url)
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

// The token never reaches logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
