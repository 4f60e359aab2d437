//! Host runtime port interfaces
//!
//! A host (workflow engine, CLI, test harness) supplies the input items'
//! parameters, the credential bundle and the continue-on-failure flag.

use async_trait::async_trait;
use budgetlink_domain::{AuthMode, ClassifiedError, Credentials};
use serde_json::Value;

/// Collaborator interface consumed by the execution pipeline
#[async_trait]
pub trait ExecutionHost: Send + Sync {
    /// Number of input items in this run
    fn item_count(&self) -> usize;

    /// Resolve a named parameter for the item at `index`
    fn parameter(&self, name: &str, index: usize) -> Option<Value>;

    /// Resolve a parameter, falling back to `default` when unset
    fn parameter_or(&self, name: &str, index: usize, default: Value) -> Value {
        self.parameter(name, index).unwrap_or(default)
    }

    /// Fetch the credential bundle for the given mode
    async fn credentials(&self, mode: AuthMode) -> Result<Credentials, ClassifiedError>;

    /// Whether per-item failures are recorded instead of aborting the run.
    ///
    /// Queried once per run.
    fn continue_on_fail(&self) -> bool;
}
