use budgetlink_core::ExecutionError;
use budgetlink_domain::ItemOutput;
use tracing::info;

use crate::context::AppContext;
use crate::workflow::Workflow;

/// A run that aborted, with the output of the items that completed first
#[derive(Debug)]
pub struct RunAborted {
    pub completed: Vec<ItemOutput>,
    pub error: ExecutionError,
}

/// Execute every item of `workflow` and return the host-facing outputs
///
/// `continue_on_fail` forces continue-on-failure mode on top of whatever the
/// workflow file asks for.
///
/// # Errors
/// [`RunAborted`] when an item fails outside continue-on-failure mode, or the
/// run fails before any item (credentials, login).
pub async fn run_workflow(
    ctx: &AppContext,
    mut workflow: Workflow,
    continue_on_fail: bool,
) -> Result<Vec<ItemOutput>, RunAborted> {
    workflow.continue_on_fail |= continue_on_fail;
    let items = workflow.items.len();

    let host = ctx.attach_credentials(workflow.into_host(ctx.config.credentials.mode));
    match ctx.service.run(&host).await {
        Ok(results) => {
            info!(items, "workflow finished");
            Ok(results.iter().map(|result| result.to_output()).collect())
        }
        Err(error) => Err(RunAborted {
            completed: error.completed.iter().map(|result| result.to_output()).collect(),
            error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use budgetlink_domain::{Config, CredentialsConfig, ErrorKind, JwtCredentials};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn context(server: &MockServer) -> AppContext {
        AppContext::new(Config {
            credentials: CredentialsConfig {
                jwt: Some(JwtCredentials::new(server.uri(), "admin", "secret")),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap()
    }

    fn workflow() -> Workflow {
        serde_json::from_value(json!({
            "items": [
                { "resource": "payee", "operation": "getAll" },
                { "resource": "payee", "operation": "delete", "parameters": { "payeeId": "gone" } }
            ]
        }))
        .unwrap()
    }

    async fn mount(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v2/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/payees"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "p1" }])))
            .mount(server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v2/payees/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Payee not found" })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn aborted_run_keeps_completed_outputs() {
        let server = MockServer::start().await;
        mount(&server).await;

        let aborted = run_workflow(&context(&server), workflow(), false).await.unwrap_err();
        assert_eq!(aborted.completed.len(), 1);
        assert_eq!(aborted.completed[0].data, json!([{ "id": "p1" }]));
        assert_eq!(aborted.error.index, Some(1));
        assert_eq!(aborted.error.error.kind(), ErrorKind::Generic);
    }

    #[tokio::test]
    async fn continue_flag_records_failures() {
        let server = MockServer::start().await;
        mount(&server).await;

        let outputs = run_workflow(&context(&server), workflow(), true).await.unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].source_index, 1);
        assert_eq!(outputs[1].data["error"], json!("Payee not found"));
    }
}
