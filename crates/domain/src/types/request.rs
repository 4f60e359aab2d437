//! Logical and concrete request shapes

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ClassifiedError;

/// API resource a workflow step acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Account,
    Budget,
    Category,
    CategoryGroup,
    Health,
    Metrics,
    Payee,
    Query,
    Transaction,
}

impl Resource {
    /// Every resource, in display order
    pub const ALL: [Resource; 9] = [
        Self::Account,
        Self::Budget,
        Self::Category,
        Self::CategoryGroup,
        Self::Health,
        Self::Metrics,
        Self::Payee,
        Self::Query,
        Self::Transaction,
    ];

    /// Identifier used by hosts (`categoryGroup`, `metrics`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Budget => "budget",
            Self::Category => "category",
            Self::CategoryGroup => "categoryGroup",
            Self::Health => "health",
            Self::Metrics => "metrics",
            Self::Payee => "payee",
            Self::Query => "query",
            Self::Transaction => "transaction",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Budget => "Budget",
            Self::Category => "Category",
            Self::CategoryGroup => "Category Group",
            Self::Health => "Health",
            Self::Metrics => "Metric",
            Self::Payee => "Payee",
            Self::Query => "Query",
            Self::Transaction => "Transaction",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ClassifiedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.as_str() == s)
            .ok_or_else(|| ClassifiedError::validation(format!("Unsupported resource: {s}")))
    }
}

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A desired API action, independent of HTTP specifics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalRequest {
    pub resource: Resource,
    pub operation: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl LogicalRequest {
    pub fn new(resource: Resource, operation: impl Into<String>) -> Self {
        Self { resource, operation: operation.into(), parameters: Map::new() }
    }

    /// Builder-style parameter insertion (mostly for tests and hosts)
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Look up a parameter by dot path (`filters.start` reads key `start` of
    /// the `filters` collection)
    pub fn parameter(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.parameters.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

/// Concrete HTTP request built from a [`LogicalRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequestSpec {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl HttpRequestSpec {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), body: None, query: None, headers: BTreeMap::new() }
    }

    /// Set the JSON body; an empty object means "no body"
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = if body.is_empty() { None } else { Some(Value::Object(body)) };
        self
    }

    /// Set the query string; an empty map means "no query"
    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach `Authorization: Bearer <token>`
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }
}
