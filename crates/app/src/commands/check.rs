use serde_json::Value;
use tracing::info;

use budgetlink_domain::{AuthMode, ClassifiedError};

use crate::context::AppContext;

/// Credential test: unauthenticated `GET` on the health endpoint
///
/// # Errors
/// Configuration error when no credentials exist for `mode`, otherwise the
/// classified upstream failure.
pub async fn check_credentials(ctx: &AppContext, mode: AuthMode) -> Result<Value, ClassifiedError> {
    let credentials = ctx.credentials(mode)?;
    let health = ctx.service.test_credentials(&credentials).await?;
    info!(mode = %mode, "credential test succeeded");
    Ok(health)
}

#[cfg(test)]
mod tests {
    use budgetlink_domain::{Config, CredentialsConfig, ErrorKind, OAuth2Credentials};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn oauth2_check_hits_derived_health_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            credentials: CredentialsConfig {
                mode: AuthMode::OAuth2,
                oauth2: Some(OAuth2Credentials {
                    auth_url: Some(format!("{}/oauth/authorize", server.uri())),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        let ctx = AppContext::new(config).unwrap();

        let health = check_credentials(&ctx, AuthMode::OAuth2).await.unwrap();
        assert_eq!(health, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_request() {
        let ctx = AppContext::new(Config::default()).unwrap();
        let err = check_credentials(&ctx, AuthMode::Jwt).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
