//! Configuration structures
//!
//! Loaded by `budgetlink_infra::config` from the environment or a TOML/JSON
//! file. Every section has defaults so partial files are accepted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_PREFIX, DEFAULT_HEALTH_PATH, DEFAULT_LOGIN_PATH, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOKEN_TTL_SECS, DEFAULT_USER_AGENT, TOKEN_EXPIRY_BUFFER_MS,
};
use crate::types::{AuthMode, JwtCredentials, OAuth2Credentials};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub credentials: CredentialsConfig,
}

/// Endpoint layout and transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix inserted between the base URL and every endpoint path
    pub api_prefix: String,
    /// Login path, relative to the prefix
    pub login_path: String,
    /// Health path, relative to the prefix
    pub health_path: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ApiConfig {
    /// `{base}{prefix}{path}` with a single slash at each joint
    pub fn endpoint_url(&self, base_url: &str, path: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let path = path.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{base}/{path}")
        } else {
            format!("{base}/{prefix}/{path}")
        }
    }

    pub fn login_url(&self, base_url: &str) -> String {
        self.endpoint_url(base_url, &self.login_path)
    }

    pub fn health_url(&self, base_url: &str) -> String {
        self.endpoint_url(base_url, &self.health_path)
    }
}

/// Token cache policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// A cached token is only reused while `expires_at > now + buffer`
    pub expiry_buffer_ms: u64,
    /// Lifetime assumed when the login response has no `expires_in`
    pub default_expires_in_secs: u64,
    /// Serialize concurrent logins for the same cache key
    pub serialize_logins: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            expiry_buffer_ms: TOKEN_EXPIRY_BUFFER_MS,
            default_expires_in_secs: DEFAULT_TOKEN_TTL_SECS,
            serialize_logins: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::default() }
    }
}

/// Credentials supplied through configuration (used by the bundled host)
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub mode: AuthMode,
    pub jwt: Option<JwtCredentials>,
    pub oauth2: Option<OAuth2Credentials>,
    /// Pre-obtained OAuth2 access token handed to the bearer transport
    #[serde(skip_serializing)]
    pub oauth2_access_token: Option<String>,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("mode", &self.mode)
            .field("jwt", &self.jwt)
            .field("oauth2", &self.oauth2)
            .field("oauth2_access_token", &self.oauth2_access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_normalizes_slashes() {
        let api = ApiConfig::default();
        assert_eq!(
            api.endpoint_url("http://localhost:3000/", "/accounts"),
            "http://localhost:3000/v2/accounts"
        );
        assert_eq!(api.login_url("http://localhost:3000"), "http://localhost:3000/v2/auth/login");
        assert_eq!(api.health_url("http://localhost:3000"), "http://localhost:3000/v2/health");
    }

    #[test]
    fn empty_prefix_is_supported() {
        let api = ApiConfig { api_prefix: String::new(), ..Default::default() };
        assert_eq!(api.login_url("http://api"), "http://api/auth/login");
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "auth": { "serialize_logins": false } }"#)
            .unwrap();
        assert!(!config.auth.serialize_logins);
        assert_eq!(config.auth.expiry_buffer_ms, 60_000);
        assert_eq!(config.api.api_prefix, "/v2");
    }
}
