//! Error types used throughout budgetlink
//!
//! Two families live here:
//! - [`BudgetLinkError`]: infrastructure and programming failures (config,
//!   serialization, transport setup).
//! - [`ClassifiedError`]: the user-facing, per-item error produced by
//!   classifying an [`UpstreamFailure`] or re-classifying a
//!   [`BudgetLinkError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Main error type for budgetlink infrastructure
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BudgetLinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for budgetlink operations
pub type Result<T> = std::result::Result<T, BudgetLinkError>;

impl From<serde_json::Error> for BudgetLinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Category of a classified, user-facing error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Login rejected the supplied username/password (401 on login)
    AuthenticationFailed,

    /// Upstream returned 429, on login or on a main request
    RateLimited,

    /// A main request was rejected because the session token is no longer valid
    AuthExpired,

    /// Base URL missing/unresolvable, or no token after a successful login
    Configuration,

    /// Malformed user input or an unsupported resource/operation pair
    Validation,

    /// Anything else
    Generic,
}

impl ErrorKind {
    /// Stable label for logs and structured error payloads
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::RateLimited => "rate_limited",
            Self::AuthExpired => "auth_expired",
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed => write!(f, "Authentication Failed"),
            Self::RateLimited => write!(f, "Rate Limited"),
            Self::AuthExpired => write!(f, "Authentication Expired"),
            Self::Configuration => write!(f, "Configuration Error"),
            Self::Validation => write!(f, "Validation Error"),
            Self::Generic => write!(f, "Request Error"),
        }
    }
}

/// Structured detail copied out of an upstream error response.
///
/// Only plain JSON values are retained, never the transport's own error
/// object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// API-level error string (`error` field of the response body)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,

    /// Raw response body as returned by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl UpstreamDetails {
    /// Returns true when no detail was captured
    pub fn is_empty(&self) -> bool {
        self.request_id.is_none()
            && self.code.is_none()
            && self.details.is_none()
            && self.error.is_none()
            && self.status_text.is_none()
            && self.response.is_none()
    }
}

/// Normalized user-facing error for a single logical request
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{kind}: {message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upstream: Option<UpstreamDetails>,
}

impl ClassifiedError {
    /// Create a new classified error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), description: None, status_code: None, upstream: None }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    /// Attach a longer, user-oriented explanation
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status_code: Option<u16>) -> Self {
        self.status_code = status_code;
        self
    }

    /// Attach upstream detail; empty detail is dropped
    pub fn with_upstream(mut self, upstream: UpstreamDetails) -> Self {
        self.upstream = if upstream.is_empty() { None } else { Some(upstream) };
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn upstream(&self) -> Option<&UpstreamDetails> {
        self.upstream.as_ref()
    }

    /// Message plus description, suitable for end users
    pub fn user_message(&self) -> String {
        match &self.description {
            Some(description) => format!("{} ({})", self.message, description),
            None => self.message.clone(),
        }
    }
}

/// Re-classify errors raised outside the HTTP path (config, serialization, ...)
impl From<BudgetLinkError> for ClassifiedError {
    fn from(err: BudgetLinkError) -> Self {
        match err {
            BudgetLinkError::Config(message) => Self::configuration(message),
            BudgetLinkError::InvalidInput(message) | BudgetLinkError::Serialization(message) => {
                Self::validation(message)
            }
            BudgetLinkError::Auth(message) => Self::new(ErrorKind::AuthenticationFailed, message),
            BudgetLinkError::Network(message) | BudgetLinkError::Internal(message) => {
                Self::generic(message)
            }
        }
    }
}

/// Raw failure reported by an HTTP transport.
///
/// Transports describe failures with this opaque payload; classification is a
/// pure function over it. A missing `status` means the request never produced
/// an HTTP response (connect error, timeout, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,

    /// Response body, parsed as JSON when possible, otherwise a JSON string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl UpstreamFailure {
    /// Failure carrying an HTTP status
    pub fn http(status: u16, status_text: Option<String>, body: Option<Value>) -> Self {
        Self { status: Some(status), message: None, status_text, body }
    }

    /// Failure that never reached an HTTP response
    pub fn transport(message: impl Into<String>) -> Self {
        Self { status: None, message: Some(message.into()), status_text: None, body: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.message) {
            (Some(status), Some(message)) => write!(f, "HTTP {status}: {message}"),
            (Some(status), None) => write!(f, "HTTP {status}"),
            (None, Some(message)) => write!(f, "{message}"),
            (None, None) => write!(f, "request failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn config_error_reclassifies_as_configuration() {
        let err: ClassifiedError = BudgetLinkError::Config("missing base url".into()).into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.message(), "missing base url");
    }

    #[test]
    fn serialization_error_reclassifies_as_validation() {
        let parse_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let err: ClassifiedError = BudgetLinkError::from(parse_err).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn empty_upstream_detail_is_dropped() {
        let err = ClassifiedError::generic("boom").with_upstream(UpstreamDetails::default());
        assert!(err.upstream().is_none());
    }

    #[test]
    fn classified_error_serializes_camel_case_without_nulls() {
        let err = ClassifiedError::new(ErrorKind::RateLimited, "Rate limit exceeded")
            .with_status(Some(429))
            .with_upstream(UpstreamDetails {
                request_id: Some("req-1".into()),
                ..Default::default()
            });

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "rateLimited",
                "message": "Rate limit exceeded",
                "statusCode": 429,
                "upstream": { "requestId": "req-1" }
            })
        );
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = ClassifiedError::new(ErrorKind::AuthExpired, "JWT token has expired or is invalid");
        assert_eq!(err.to_string(), "Authentication Expired: JWT token has expired or is invalid");
    }

    #[test]
    fn upstream_failure_display() {
        assert_eq!(UpstreamFailure::http(404, None, None).to_string(), "HTTP 404");
        assert_eq!(UpstreamFailure::transport("connection refused").to_string(), "connection refused");
    }
}
