//! Test doubles for the transport ports
//!
//! Enabled for unit tests and, through the `test-utils` feature, for
//! downstream crates' tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use budgetlink_domain::{HttpRequestSpec, UpstreamFailure};
use parking_lot::Mutex;
use serde_json::Value;

use crate::transport_ports::{AuthenticatedTransport, HttpTransport};

/// Scripted transport that records every request it receives.
///
/// Responses are served in the order they were scripted; once the script is
/// exhausted every call fails with a transport error.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    script: Mutex<VecDeque<Result<Value, UpstreamFailure>>>,
    requests: Mutex<Vec<HttpRequestSpec>>,
    credential_names: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn respond(self, body: Value) -> Self {
        self.script.lock().push_back(Ok(body));
        self
    }

    /// Queue a failure
    pub fn fail(self, failure: UpstreamFailure) -> Self {
        self.script.lock().push_back(Err(failure));
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<HttpRequestSpec> {
        self.requests.lock().clone()
    }

    /// Credential names passed to [`AuthenticatedTransport::send_authenticated`]
    pub fn credential_names(&self) -> Vec<String> {
        self.credential_names.lock().clone()
    }

    fn next(&self, request: HttpRequestSpec) -> Result<Value, UpstreamFailure> {
        self.requests.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamFailure::transport("no scripted response")))
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequestSpec) -> Result<Value, UpstreamFailure> {
        self.next(request)
    }
}

#[async_trait]
impl AuthenticatedTransport for RecordingTransport {
    async fn send_authenticated(
        &self,
        credential_name: &str,
        request: HttpRequestSpec,
    ) -> Result<Value, UpstreamFailure> {
        self.credential_names.lock().push(credential_name.to_string());
        self.next(request)
    }
}
