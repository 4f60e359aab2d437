//! Authenticated request pipeline - per-item execution

use std::sync::Arc;

use budgetlink_domain::constants::OAUTH2_CREDENTIAL_NAME;
use budgetlink_domain::{
    AuthMode, ClassifiedError, Credentials, ErrorKind, HttpMethod, HttpRequestSpec, ItemResult,
    JwtCredentials, LogicalRequest, Resource,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::auth::{resolve_base_url, JwtAuthenticator};
use crate::catalog::{build_request, Catalog};
use crate::classify::classify_request_failure;
use crate::host_ports::ExecutionHost;
use crate::transport_ports::{AuthenticatedTransport, HttpTransport};

/// A run that stopped early.
///
/// `completed` holds the results of the items processed before the failure,
/// in input order. `index` is `None` when the run failed before any item was
/// attempted (credentials, base URL, login).
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ExecutionError {
    pub index: Option<usize>,
    #[source]
    pub error: ClassifiedError,
    pub completed: Vec<ItemResult>,
}

impl ExecutionError {
    fn before_items(error: ClassifiedError) -> Self {
        Self { index: None, error, completed: Vec::new() }
    }
}

/// Resolved authentication state shared by every item of a run
enum Session {
    Jwt { credentials: JwtCredentials, base_url: String, token: String },
    OAuth2 { base_url: String },
}

impl Session {
    fn mode(&self) -> AuthMode {
        match self {
            Self::Jwt { .. } => AuthMode::Jwt,
            Self::OAuth2 { .. } => AuthMode::OAuth2,
        }
    }

    fn base_url(&self) -> &str {
        match self {
            Self::Jwt { base_url, .. } | Self::OAuth2 { base_url } => base_url,
        }
    }
}

/// Executes every input item of a run against the API
pub struct ExecutionService {
    catalog: Catalog,
    authenticator: Arc<JwtAuthenticator>,
    transport: Arc<dyn HttpTransport>,
    oauth2_transport: Option<Arc<dyn AuthenticatedTransport>>,
}

impl ExecutionService {
    /// Create a service issuing JWT-mode requests through `transport`.
    ///
    /// Endpoint layout comes from the authenticator's [`ApiConfig`].
    ///
    /// [`ApiConfig`]: budgetlink_domain::ApiConfig
    pub fn new(transport: Arc<dyn HttpTransport>, authenticator: Arc<JwtAuthenticator>) -> Self {
        Self { catalog: Catalog::standard(), authenticator, transport, oauth2_transport: None }
    }

    /// Host-managed transport used in OAuth2 mode
    pub fn with_oauth2_transport(mut self, transport: Arc<dyn AuthenticatedTransport>) -> Self {
        self.oauth2_transport = Some(transport);
        self
    }

    /// Execute all input items, returning one result per item in input order.
    ///
    /// In normal mode the first failing item aborts the run. With
    /// continue-on-failure enabled, failures are recorded as results and the
    /// remaining items are still attempted.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the run aborts.
    pub async fn run(&self, host: &dyn ExecutionHost) -> Result<Vec<ItemResult>, ExecutionError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("execution_run", run_id = %run_id, items = host.item_count());
        self.run_items(host).instrument(span).await
    }

    /// Call the health endpoint without authentication to check that the
    /// credentials point at a reachable API.
    ///
    /// # Errors
    ///
    /// Configuration error for an unusable base URL, otherwise the classified
    /// upstream failure.
    pub async fn test_credentials(&self, credentials: &Credentials) -> Result<Value, ClassifiedError> {
        let base_url = resolve_base_url(credentials)?;
        let url = self.authenticator.api_config().health_url(&base_url);
        info!(url = %url, "testing credentials");
        self.transport
            .send(HttpRequestSpec::new(HttpMethod::Get, url))
            .await
            .map_err(|failure| classify_request_failure(&failure, credentials.auth_mode()))
    }

    async fn run_items(&self, host: &dyn ExecutionHost) -> Result<Vec<ItemResult>, ExecutionError> {
        let mode = auth_mode(host).map_err(ExecutionError::before_items)?;
        let continue_on_fail = host.continue_on_fail();
        let session = self.open_session(host, mode).await.map_err(ExecutionError::before_items)?;
        info!(mode = %mode, continue_on_fail, "starting run");

        let mut results = Vec::with_capacity(host.item_count());
        for index in 0..host.item_count() {
            match self.execute_item(host, index, &session).await {
                Ok(data) => results.push(ItemResult::success(index, data)),
                Err(error) if continue_on_fail => {
                    warn!(index, kind = error.kind().label(), error = %error, "item failed, continuing");
                    results.push(ItemResult::failure(index, error));
                }
                Err(error) => {
                    warn!(index, kind = error.kind().label(), error = %error, "item failed, aborting run");
                    return Err(ExecutionError { index: Some(index), error, completed: results });
                }
            }
        }

        info!(succeeded = results.iter().filter(|r| r.is_success()).count(), "run finished");
        Ok(results)
    }

    async fn open_session(
        &self,
        host: &dyn ExecutionHost,
        mode: AuthMode,
    ) -> Result<Session, ClassifiedError> {
        let credentials = host.credentials(mode).await?;
        if credentials.auth_mode() != mode {
            return Err(ClassifiedError::configuration(format!(
                "Expected {mode} credentials but received {}",
                credentials.auth_mode()
            )));
        }

        let base_url = resolve_base_url(&credentials)?;
        match credentials {
            Credentials::Jwt(credentials) => {
                let token = self.authenticator.access_token(&credentials).await?;
                Ok(Session::Jwt { credentials, base_url, token })
            }
            Credentials::OAuth2(_) => Ok(Session::OAuth2 { base_url }),
        }
    }

    async fn execute_item(
        &self,
        host: &dyn ExecutionHost,
        index: usize,
        session: &Session,
    ) -> Result<Value, ClassifiedError> {
        let resource: Resource = required_string(host, "resource", index)?.parse()?;
        let operation = required_string(host, "operation", index)?;
        let endpoint = self.catalog.lookup(resource, &operation)?;

        let mut parameters = Map::new();
        for name in endpoint.parameter_names() {
            if let Some(value) = host.parameter(name, index) {
                parameters.insert(name.to_string(), value);
            }
        }
        let request = LogicalRequest { resource, operation, parameters };

        let spec = build_request(
            endpoint,
            &request,
            session.base_url(),
            self.authenticator.api_config(),
        )?;
        debug!(index, method = %spec.method, url = %spec.url, "sending request");

        let response = match session {
            Session::Jwt { token, .. } => self.transport.send(spec.with_bearer(token)).await,
            Session::OAuth2 { .. } => {
                let transport = self.oauth2_transport.as_ref().ok_or_else(|| {
                    ClassifiedError::configuration(
                        "OAuth2 requests need a host-managed authenticated transport",
                    )
                })?;
                transport.send_authenticated(OAUTH2_CREDENTIAL_NAME, spec).await
            }
        };

        response.map_err(|failure| {
            let error = classify_request_failure(&failure, session.mode());
            if let Session::Jwt { credentials, .. } = session {
                if failure.status == Some(401) && error.kind() == ErrorKind::AuthExpired {
                    self.authenticator.invalidate(credentials);
                    info!(index, "cleared cached token after 401");
                }
            }
            error
        })
    }
}

fn auth_mode(host: &dyn ExecutionHost) -> Result<AuthMode, ClassifiedError> {
    match host.parameter("authentication", 0) {
        None | Some(Value::Null) => Ok(AuthMode::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
            ClassifiedError::validation(format!("Unsupported authentication method: {value}"))
        }),
    }
}

fn required_string(
    host: &dyn ExecutionHost,
    name: &str,
    index: usize,
) -> Result<String, ClassifiedError> {
    host.parameter(name, index)
        .as_ref()
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ClassifiedError::validation(format!("Missing required parameter: {name}")))
}
