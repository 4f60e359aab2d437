//! In-memory [`ExecutionHost`]
//!
//! Backs the command-line runner and tests. Item parameters shadow
//! node-level parameters of the same name.

use async_trait::async_trait;
use budgetlink_domain::{
    AuthMode, ClassifiedError, Credentials, JwtCredentials, OAuth2Credentials, Resource,
};
use serde_json::{Map, Value};

use crate::host_ports::ExecutionHost;

#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    node_parameters: Map<String, Value>,
    items: Vec<Map<String, Value>>,
    jwt: Option<JwtCredentials>,
    oauth2: Option<OAuth2Credentials>,
    continue_on_fail: bool,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authentication(mut self, mode: AuthMode) -> Self {
        let value = match mode {
            AuthMode::Jwt => "jwt",
            AuthMode::OAuth2 => "oAuth2",
        };
        self.node_parameters.insert("authentication".into(), Value::String(value.into()));
        self
    }

    /// Node-level parameter visible to every item
    pub fn with_node_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.node_parameters.insert(name.into(), value);
        self
    }

    /// Append an item with raw parameters
    pub fn with_item(mut self, parameters: Map<String, Value>) -> Self {
        self.items.push(parameters);
        self
    }

    /// Append an item targeting `resource.operation`
    pub fn with_request(
        self,
        resource: Resource,
        operation: &str,
        mut parameters: Map<String, Value>,
    ) -> Self {
        parameters.insert("resource".into(), Value::String(resource.as_str().into()));
        parameters.insert("operation".into(), Value::String(operation.into()));
        self.with_item(parameters)
    }

    pub fn with_jwt(mut self, credentials: JwtCredentials) -> Self {
        self.jwt = Some(credentials);
        self
    }

    pub fn with_oauth2(mut self, credentials: OAuth2Credentials) -> Self {
        self.oauth2 = Some(credentials);
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }
}

#[async_trait]
impl ExecutionHost for InMemoryHost {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn parameter(&self, name: &str, index: usize) -> Option<Value> {
        self.items
            .get(index)
            .and_then(|item| item.get(name))
            .or_else(|| self.node_parameters.get(name))
            .cloned()
    }

    async fn credentials(&self, mode: AuthMode) -> Result<Credentials, ClassifiedError> {
        let credentials = match mode {
            AuthMode::Jwt => self.jwt.clone().map(Credentials::Jwt),
            AuthMode::OAuth2 => self.oauth2.clone().map(Credentials::OAuth2),
        };
        credentials.ok_or_else(|| {
            ClassifiedError::configuration(format!(
                "No credentials configured for {mode} authentication"
            ))
        })
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}
