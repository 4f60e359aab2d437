//! HTTP transport port interfaces
//!
//! Implemented in `budgetlink-infra` (reqwest) or by a host runtime. Failures
//! are reported as [`UpstreamFailure`] so classification never depends on a
//! concrete HTTP library.

use async_trait::async_trait;
use budgetlink_domain::{HttpRequestSpec, UpstreamFailure};
use serde_json::Value;

/// Plain JSON-over-HTTP transport
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue the request once and return the decoded JSON body.
    ///
    /// Non-2xx responses must be returned as `Err` with `status` set.
    async fn send(&self, request: HttpRequestSpec) -> Result<Value, UpstreamFailure>;
}

/// Credential-aware transport owned by the host (OAuth2 mode).
///
/// The host attaches and refreshes tokens itself; callers never see them.
#[async_trait]
pub trait AuthenticatedTransport: Send + Sync {
    async fn send_authenticated(
        &self,
        credential_name: &str,
        request: HttpRequestSpec,
    ) -> Result<Value, UpstreamFailure>;
}
