//! JWT login with token reuse

use std::sync::Arc;

use budgetlink_domain::constants::TOKEN_TTL_SAFETY_SECS;
use budgetlink_domain::{
    ApiConfig, AuthConfig, ClassifiedError, HttpMethod, HttpRequestSpec, JwtCredentials,
};
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::token_cache::{CacheKey, CachedToken, TokenCache};
use crate::classify::classify_login_failure;
use crate::transport_ports::HttpTransport;

/// Obtains bearer tokens for JWT credentials, reusing cached ones.
///
/// With `serialize_logins` enabled, concurrent callers for the same
/// credential wait on a per-key lock and re-check the cache, so a burst of
/// invocations produces a single login request.
pub struct JwtAuthenticator {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn TokenCache>,
    api: ApiConfig,
    auth: AuthConfig,
    login_locks: DashMap<CacheKey, Arc<Mutex<()>>>,
}

impl JwtAuthenticator {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<dyn TokenCache>) -> Self {
        Self {
            transport,
            cache,
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            login_locks: DashMap::new(),
        }
    }

    pub fn with_api_config(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    pub fn with_auth_config(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn api_config(&self) -> &ApiConfig {
        &self.api
    }

    pub fn cache(&self) -> &Arc<dyn TokenCache> {
        &self.cache
    }

    /// Return a bearer token for `credentials`, logging in only when no
    /// valid cached token exists.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailed` / `RateLimited` / `Generic` when login fails
    /// - `Configuration` when the base URL is empty or the login response has
    ///   no `access_token`
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn access_token(&self, credentials: &JwtCredentials) -> Result<String, ClassifiedError> {
        let key = CacheKey::new(&credentials.base_url, &credentials.username);
        if let Some(token) = self.cache.get_valid(&key) {
            debug!("using cached token");
            return Ok(token);
        }

        if !self.auth.serialize_logins {
            return self.login(credentials, key).await;
        }

        let lock = self.login_locks.entry(key.clone()).or_default().clone();
        let _guard = lock.lock().await;

        // Another caller may have logged in while we waited
        if let Some(token) = self.cache.get_valid(&key) {
            debug!("using token cached by concurrent login");
            return Ok(token);
        }

        self.login(credentials, key).await
    }

    /// Drop the cached token for `credentials`
    pub fn invalidate(&self, credentials: &JwtCredentials) -> bool {
        self.cache.invalidate(&CacheKey::new(&credentials.base_url, &credentials.username))
    }

    async fn login(&self, credentials: &JwtCredentials, key: CacheKey) -> Result<String, ClassifiedError> {
        let base_url = credentials.base_url.trim();
        if base_url.is_empty() {
            return Err(ClassifiedError::configuration(
                "Base URL is not configured. Please check your credentials.",
            ));
        }

        let mut body = Map::new();
        body.insert("username".into(), Value::String(credentials.username.clone()));
        body.insert("password".into(), Value::String(credentials.password.clone()));
        let request =
            HttpRequestSpec::new(HttpMethod::Post, self.api.login_url(base_url)).with_body(body);

        info!(base_url = %base_url, "logging in");
        let response = self.transport.send(request).await.map_err(|failure| {
            warn!(status = ?failure.status, "login failed");
            classify_login_failure(&failure)
        })?;

        let token = response
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ClassifiedError::configuration("Failed to obtain access token"))?
            .to_string();

        let expires_in = response
            .get("expires_in")
            .and_then(|value| value.as_u64().or_else(|| value.as_f64().map(|secs| secs.max(0.0) as u64)))
            .filter(|secs| *secs > 0)
            .unwrap_or(self.auth.default_expires_in_secs);
        let lifetime_ms = expires_in.saturating_sub(TOKEN_TTL_SAFETY_SECS).saturating_mul(1000);
        let expires_at_ms = self.cache.now_millis().saturating_add(lifetime_ms);

        self.cache.store(key, CachedToken { token: token.clone(), expires_at_ms });
        info!(expires_in, "login succeeded");
        Ok(token)
    }
}
