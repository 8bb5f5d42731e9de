use std::time::Duration;

use stockroom_auth::Role;

pub const API_URL_ENV: &str = "STOCKROOM_API_URL";
pub const AUTH_TOKEN_ENV: &str = "STOCKROOM_AUTH_TOKEN";
pub const TIMEOUT_ENV: &str = "STOCKROOM_TIMEOUT_SECS";
pub const ROLE_ENV: &str = "STOCKROOM_ROLE";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    /// Role of the signed-in user, used for local capability checks.
    pub role: Option<Role>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            role: None,
        }
    }

    /// Read `STOCKROOM_API_URL`, `STOCKROOM_AUTH_TOKEN`,
    /// `STOCKROOM_TIMEOUT_SECS` and `STOCKROOM_ROLE`, falling back to
    /// defaults. Blank or unparseable values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(get(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string()));
        config.token = get(AUTH_TOKEN_ENV).map(|t| t.trim().to_string());
        if let Some(secs) = get(TIMEOUT_ENV).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        config.role = get(ROLE_ENV).and_then(|v| v.parse::<Role>().ok());
        config
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_url(api_url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for a backend path such as `/stock/items`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
