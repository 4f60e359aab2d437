//! Application context - dependency injection container

use std::sync::Arc;

use budgetlink_core::{
    ExecutionService, HttpTransport, InMemoryHost, InMemoryTokenCache, JwtAuthenticator,
    TokenCache,
};
use budgetlink_domain::{AuthMode, ClassifiedError, Config, Credentials, Result};
use budgetlink_infra::{OAuth2Transport, ReqwestTransport, StaticTokenProvider};
use tracing::debug;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub service: Arc<ExecutionService>,
    pub authenticator: Arc<JwtAuthenticator>,
}

impl AppContext {
    /// Wire the reqwest transports, token cache and execution service
    ///
    /// The OAuth2 transport is only registered when an access token is
    /// configured.
    ///
    /// # Errors
    /// Returns `BudgetLinkError::Config` if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let reqwest = ReqwestTransport::from_api_config(&config.api)?;
        let transport: Arc<dyn HttpTransport> = Arc::new(reqwest.clone());

        let cache: Arc<dyn TokenCache> =
            Arc::new(InMemoryTokenCache::new().with_buffer_ms(config.auth.expiry_buffer_ms));
        let authenticator = Arc::new(
            JwtAuthenticator::new(transport.clone(), cache)
                .with_api_config(config.api.clone())
                .with_auth_config(config.auth.clone()),
        );

        let mut service = ExecutionService::new(transport, authenticator.clone());
        if let Some(token) = &config.credentials.oauth2_access_token {
            debug!("registering OAuth2 bearer transport");
            service = service.with_oauth2_transport(Arc::new(OAuth2Transport::new(
                reqwest,
                Arc::new(StaticTokenProvider::new(token.clone())),
            )));
        }

        Ok(Self { config, service: Arc::new(service), authenticator })
    }

    /// Configured credentials for `mode`
    ///
    /// # Errors
    /// Configuration error when nothing is configured for that mode.
    pub fn credentials(&self, mode: AuthMode) -> std::result::Result<Credentials, ClassifiedError> {
        let credentials = &self.config.credentials;
        let resolved = match mode {
            AuthMode::Jwt => credentials.jwt.clone().map(Credentials::Jwt),
            AuthMode::OAuth2 => credentials.oauth2.clone().map(Credentials::OAuth2),
        };
        resolved.ok_or_else(|| {
            ClassifiedError::configuration(format!(
                "No credentials configured for {mode} authentication"
            ))
        })
    }

    /// Attach every configured credential bundle to `host`
    pub fn attach_credentials(&self, mut host: InMemoryHost) -> InMemoryHost {
        if let Some(jwt) = &self.config.credentials.jwt {
            host = host.with_jwt(jwt.clone());
        }
        if let Some(oauth2) = &self.config.credentials.oauth2 {
            host = host.with_oauth2(oauth2.clone());
        }
        host
    }
}

#[cfg(test)]
mod tests {
    use budgetlink_domain::{CredentialsConfig, ErrorKind, JwtCredentials};

    use super::*;

    fn jwt_config() -> Config {
        Config {
            credentials: CredentialsConfig {
                mode: AuthMode::Jwt,
                jwt: Some(JwtCredentials::new("http://localhost:3000", "admin", "secret")),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn resolves_configured_credentials() {
        let ctx = AppContext::new(jwt_config()).unwrap();

        match ctx.credentials(AuthMode::Jwt).unwrap() {
            Credentials::Jwt(jwt) => assert_eq!(jwt.username, "admin"),
            other => panic!("expected JWT credentials, got {other:?}"),
        }

        let err = ctx.credentials(AuthMode::OAuth2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn uses_configured_api_layout() {
        let mut config = jwt_config();
        config.api.api_prefix = String::new();

        let ctx = AppContext::new(config).unwrap();
        assert_eq!(ctx.authenticator.api_config().login_url("http://api"), "http://api/auth/login");
    }
}
