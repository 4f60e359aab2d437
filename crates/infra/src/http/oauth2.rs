//! OAuth2 bearer transport
//!
//! In OAuth2 mode the host owns the token lifecycle. This adapter plays the
//! host's part for the command-line runner: it asks an [`AccessTokenProvider`]
//! for the current token and attaches it to the outgoing request.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use budgetlink_core::AuthenticatedTransport;
use budgetlink_domain::constants::OAUTH2_CREDENTIAL_NAME;
use budgetlink_domain::{BudgetLinkError, HttpRequestSpec, UpstreamFailure};
use serde_json::Value;
use tracing::{debug, instrument};

use super::transport::ReqwestTransport;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// This method should handle token refresh if needed.
    async fn access_token(&self) -> Result<String, BudgetLinkError>;
}

/// Provider for a token obtained out of band
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, BudgetLinkError> {
        if self.token.trim().is_empty() {
            return Err(BudgetLinkError::Auth("OAuth2 access token is empty".into()));
        }
        Ok(self.token.clone())
    }
}

/// [`AuthenticatedTransport`] that attaches a provider's bearer token
pub struct OAuth2Transport {
    inner: ReqwestTransport,
    provider: Arc<dyn AccessTokenProvider>,
    credential_name: String,
}

impl OAuth2Transport {
    /// Transport answering for the standard OAuth2 credential name
    pub fn new(inner: ReqwestTransport, provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self { inner, provider, credential_name: OAUTH2_CREDENTIAL_NAME.to_string() }
    }

    pub fn with_credential_name(mut self, name: impl Into<String>) -> Self {
        self.credential_name = name.into();
        self
    }
}

#[async_trait]
impl AuthenticatedTransport for OAuth2Transport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send_authenticated(
        &self,
        credential_name: &str,
        request: HttpRequestSpec,
    ) -> Result<Value, UpstreamFailure> {
        if credential_name != self.credential_name {
            return Err(UpstreamFailure::transport(format!(
                "No OAuth2 token provider registered for credential {credential_name}"
            )));
        }

        let token = self
            .provider
            .access_token()
            .await
            .map_err(|err| UpstreamFailure::transport(err.to_string()))?;
        debug!(credential = credential_name, "attached OAuth2 bearer token");

        let builder = self.inner.prepare(&request.with_bearer(&token));
        self.inner.execute(builder).await
    }
}
