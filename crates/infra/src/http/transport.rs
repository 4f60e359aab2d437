//! reqwest-backed [`HttpTransport`]
//!
//! Serializes an [`HttpRequestSpec`] onto the wire and turns the response into
//! either a JSON value or an [`UpstreamFailure`]. Nothing here decides what a
//! failure means; classification happens in `budgetlink-core`.

use async_trait::async_trait;
use budgetlink_core::HttpTransport;
use budgetlink_domain::constants::CONTENT_TYPE_JSON;
use budgetlink_domain::{ApiConfig, BudgetLinkError, HttpMethod, HttpRequestSpec, UpstreamFailure};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::HttpClient;
use crate::errors::IntoUpstreamFailure;

/// [`HttpTransport`] over a shared [`HttpClient`]
#[derive(Clone)]
pub struct ReqwestTransport {
    client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn from_api_config(config: &ApiConfig) -> Result<Self, BudgetLinkError> {
        Ok(Self::new(HttpClient::from_api_config(config)?))
    }

    pub(crate) fn prepare(&self, spec: &HttpRequestSpec) -> RequestBuilder {
        let mut builder =
            self.client.request(to_method(spec.method), &spec.url).header(ACCEPT, CONTENT_TYPE_JSON);

        if let Some(query) = &spec.query {
            builder = builder.query(query);
        }
        for (name, value) in &spec.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }
        builder
    }

    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Value, UpstreamFailure> {
        let response = self.client.send(builder).await?;
        read_response(response).await
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequestSpec) -> Result<Value, UpstreamFailure> {
        let builder = self.prepare(&request);
        self.execute(builder).await
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Decode a response body.
///
/// Empty bodies become `null`; bodies that are not JSON are kept as a JSON
/// string. Non-2xx statuses become an [`UpstreamFailure`] carrying the decoded
/// body. An HTML error page is flagged in the failure message so it reads as
/// an unsupported content type.
async fn read_response(response: Response) -> Result<Value, UpstreamFailure> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase);

    let text = response.text().await.map_err(IntoUpstreamFailure::into_upstream_failure)?;
    let body = decode_body(&text);

    if status.is_success() {
        return Ok(body);
    }

    debug!(status = status.as_u16(), "upstream returned error status");
    let body = (!text.trim().is_empty()).then_some(body);
    let mut failure = UpstreamFailure::http(
        status.as_u16(),
        status.canonical_reason().map(str::to_string),
        body,
    );
    if content_type.as_deref().is_some_and(|ct| ct.starts_with("text/html")) {
        failure = failure.with_message("Unsupported content type: text/html");
    }
    Err(failure)
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
