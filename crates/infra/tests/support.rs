//! Shared wiring for the pipeline integration tests

#![allow(dead_code)]

use std::sync::Arc;

use budgetlink_core::{ExecutionService, HttpTransport, InMemoryHost, JwtAuthenticator, TokenCache};
use budgetlink_domain::{ApiConfig, AuthMode, JwtCredentials, Resource};
use budgetlink_infra::{OAuth2Transport, ReqwestTransport, StaticTokenProvider};
use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN_PATH: &str = "/v2/auth/login";

/// JWT service over the real reqwest transport
pub fn jwt_service(cache: Arc<dyn TokenCache>) -> (ExecutionService, Arc<JwtAuthenticator>) {
    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::from_api_config(&ApiConfig::default()).unwrap());
    let authenticator = Arc::new(JwtAuthenticator::new(transport.clone(), cache));
    (ExecutionService::new(transport, authenticator.clone()), authenticator)
}

/// Service whose OAuth2 requests carry `token`
pub fn oauth2_service(cache: Arc<dyn TokenCache>, token: &str) -> ExecutionService {
    let (service, _) = jwt_service(cache);
    let inner = ReqwestTransport::from_api_config(&ApiConfig::default()).unwrap();
    service.with_oauth2_transport(Arc::new(OAuth2Transport::new(
        inner,
        Arc::new(StaticTokenProvider::new(token)),
    )))
}

pub fn credentials(server: &MockServer, username: &str) -> JwtCredentials {
    JwtCredentials::new(server.uri(), username, "secret")
}

pub fn jwt_host(credentials: JwtCredentials) -> InMemoryHost {
    InMemoryHost::new().with_authentication(AuthMode::Jwt).with_jwt(credentials)
}

pub fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn get_accounts(host: InMemoryHost) -> InMemoryHost {
    host.with_request(Resource::Account, "getAll", Map::new())
}

/// Login mock answering with `token`, asserted to be hit `times` times
pub async fn mount_login(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": token, "expires_in": 3600 })),
        )
        .expect(times)
        .mount(server)
        .await;
}
