//! Workflow files
//!
//! A workflow is the command-line stand-in for a host's input items:
//!
//! ```json
//! {
//!   "authentication": "jwt",
//!   "items": [
//!     { "resource": "account", "operation": "getBalance", "parameters": { "accountId": "a1" } }
//!   ]
//! }
//! ```

use std::path::Path;

use budgetlink_core::InMemoryHost;
use budgetlink_domain::{AuthMode, BudgetLinkError, Resource, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Falls back to the configured mode when absent
    #[serde(default)]
    pub authentication: Option<AuthMode>,
    #[serde(default)]
    pub continue_on_fail: bool,
    /// Parameters visible to every item unless the item overrides them
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub items: Vec<WorkflowItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowItem {
    pub resource: Resource,
    pub operation: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl Workflow {
    /// Read a workflow from a JSON file
    ///
    /// # Errors
    /// `InvalidInput` if the file cannot be read, `Serialization` if it is not
    /// a valid workflow.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BudgetLinkError::InvalidInput(format!(
                "Failed to read workflow {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Host carrying this workflow's items; credentials are added by the caller
    pub fn into_host(self, default_mode: AuthMode) -> InMemoryHost {
        let mut host = InMemoryHost::new()
            .with_authentication(self.authentication.unwrap_or(default_mode))
            .with_continue_on_fail(self.continue_on_fail);

        for (name, value) in self.parameters {
            host = host.with_node_parameter(name, value);
        }
        for item in self.items {
            host = host.with_request(item.resource, &item.operation, item.parameters);
        }
        host
    }
}
