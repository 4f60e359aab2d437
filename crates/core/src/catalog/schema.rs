//! Serializable catalog description for host UIs

use budgetlink_domain::constants::{JWT_CREDENTIAL_NAME, OAUTH2_CREDENTIAL_NAME};
use budgetlink_domain::{AuthMode, Resource};
use serde::Serialize;

use super::{Catalog, FieldKind, Target};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSchema {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub authentication: Vec<AuthOption>,
    pub resources: Vec<ResourceSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOption {
    pub mode: AuthMode,
    pub display_name: &'static str,
    pub credential: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSchema {
    pub name: &'static str,
    pub display_name: &'static str,
    pub operations: Vec<OperationSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSchema {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Dot path into the logical parameters
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
    /// `path:accountId`, `body:account.name` or `query:start`
    pub routing: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

pub(super) fn describe(catalog: &Catalog) -> NodeSchema {
    let authentication = [AuthMode::Jwt, AuthMode::OAuth2]
        .into_iter()
        .map(|mode| AuthOption {
            mode,
            display_name: mode.display_name(),
            credential: match mode {
                AuthMode::Jwt => JWT_CREDENTIAL_NAME,
                AuthMode::OAuth2 => OAUTH2_CREDENTIAL_NAME,
            },
        })
        .collect();

    let resources = Resource::ALL
        .into_iter()
        .map(|resource| ResourceSchema {
            name: resource.as_str(),
            display_name: resource.display_name(),
            operations: catalog
                .operations(resource)
                .map(|endpoint| OperationSchema {
                    name: endpoint.operation,
                    display_name: endpoint.display_name,
                    description: endpoint.description,
                    method: endpoint.method.as_str(),
                    path: endpoint.path,
                    fields: endpoint
                        .bindings
                        .iter()
                        .map(|binding| FieldSchema {
                            name: binding.source,
                            kind: binding.kind,
                            required: binding.required,
                            routing: match binding.target {
                                Target::Path(name) => format!("path:{name}"),
                                Target::Body(path) => format!("body:{path}"),
                                Target::Query(key) => format!("query:{key}"),
                            },
                            default: binding.default,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    NodeSchema {
        name: "actualBudgetRestApi",
        display_name: "Actual Budget REST API",
        description: "Interact with Actual Budget via the REST API wrapper",
        authentication,
        resources,
    }
}
