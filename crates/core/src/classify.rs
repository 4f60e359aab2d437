//! Upstream failure classification
//!
//! Pure functions from an [`UpstreamFailure`] to a [`ClassifiedError`]. The
//! rules, in precedence order:
//!
//! | situation | kind |
//! |---|---|
//! | login returned 401 | `AuthenticationFailed` |
//! | any request returned 429 | `RateLimited` |
//! | main request returned 401 or 403 | `AuthExpired` |
//! | main request returned 400 in OAuth2 mode | `AuthExpired` |
//! | main request returned 400 mentioning an auth keyword | `AuthExpired` |
//! | anything else | `Generic` |

use budgetlink_domain::{AuthMode, ClassifiedError, ErrorKind, UpstreamDetails, UpstreamFailure};
use serde_json::Value;

/// Lower-cased fragments that mark a 400 as a session problem. The last two
/// catch an HTML login page served in place of JSON.
const AUTH_KEYWORDS: &[&str] = &[
    "unauthorized",
    "authentication",
    "token",
    "expired",
    "unsupported content type",
    "text/html",
];

/// Classify a failed login request (JWT mode)
pub fn classify_login_failure(failure: &UpstreamFailure) -> ClassifiedError {
    let classified = match failure.status {
        Some(401) => ClassifiedError::new(
            ErrorKind::AuthenticationFailed,
            "Authentication failed: invalid username or password",
        )
        .with_description("Invalid username or password. Please check your JWT credentials."),
        Some(429) => ClassifiedError::new(ErrorKind::RateLimited, "Rate limit exceeded")
            .with_description("Too many login attempts. Please wait a moment and try again."),
        _ => ClassifiedError::generic("Failed to authenticate with JWT").with_description(
            effective_message(failure)
                .unwrap_or_else(|| "Please check your credentials and API base URL.".to_string()),
        ),
    };

    classified.with_status(failure.status).with_upstream(upstream_details(failure))
}

/// Classify a failed main request
pub fn classify_request_failure(failure: &UpstreamFailure, mode: AuthMode) -> ClassifiedError {
    let message = effective_message(failure);

    let classified = if failure.status == Some(429) {
        ClassifiedError::new(ErrorKind::RateLimited, "Rate limit exceeded").with_description(
            "Too many requests. Please wait a moment and try again, or check your rate limiting \
             configuration.",
        )
    } else if is_auth_failure(failure.status, mode, message.as_deref()) {
        let method = mode.display_name();
        ClassifiedError::new(
            ErrorKind::AuthExpired,
            format!("{method} token has expired or is invalid"),
        )
        .with_description(format!(
            "Your {method} authentication token has expired. Please reconnect your credentials \
             to obtain a new token."
        ))
    } else {
        let description = match failure.status {
            Some(status) => format!("Request failed with status code {status}"),
            None => "Please check your request parameters and try again.".to_string(),
        };
        ClassifiedError::generic(message.unwrap_or_else(|| "Request failed".to_string()))
            .with_description(description)
    };

    classified.with_status(failure.status).with_upstream(upstream_details(failure))
}

fn is_auth_failure(status: Option<u16>, mode: AuthMode, message: Option<&str>) -> bool {
    match status {
        Some(401 | 403) => true,
        Some(400) => mode == AuthMode::OAuth2 || message.is_some_and(has_auth_keyword),
        _ => false,
    }
}

fn has_auth_keyword(message: &str) -> bool {
    let lowered = message.to_lowercase();
    AUTH_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// First usable message: transport message, body `message`, body `error`
/// (string or `{message}`), then the HTTP status text.
pub fn effective_message(failure: &UpstreamFailure) -> Option<String> {
    let body = failure.body.as_ref();
    let from_body = |key: &str| body.and_then(|b| b.get(key)).and_then(Value::as_str);

    failure
        .message
        .as_deref()
        .or_else(|| from_body("message"))
        .or_else(|| from_body("error"))
        .or_else(|| {
            body.and_then(|b| b.get("error"))
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .or(failure.status_text.as_deref())
        .or_else(|| body.and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Structured, serializable detail copied out of the failure
pub fn upstream_details(failure: &UpstreamFailure) -> UpstreamDetails {
    let object = failure.body.as_ref().and_then(Value::as_object);
    let field = |key: &str| object.and_then(|o| o.get(key)).filter(|v| !v.is_null()).cloned();

    UpstreamDetails {
        request_id: field("requestId").and_then(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }),
        code: field("code"),
        details: field("details"),
        error: field("error").and_then(|v| match v {
            Value::String(s) => Some(s),
            other => other.get("message").and_then(Value::as_str).map(str::to_string),
        }),
        status_text: failure.status_text.clone(),
        response: failure.body.clone().filter(|body| !body.is_null()),
    }
}
