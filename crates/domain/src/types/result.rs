//! Per-item execution results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ClassifiedError;

/// Outcome of one logical request
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Success(Value),
    /// Recorded failure (continue-on-failure mode only)
    Failure(ClassifiedError),
}

/// Result for one input item, tagged with the item's index
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult {
    pub source_index: usize,
    pub outcome: ItemOutcome,
}

impl ItemResult {
    pub fn success(source_index: usize, data: Value) -> Self {
        Self { source_index, outcome: ItemOutcome::Success(data) }
    }

    pub fn failure(source_index: usize, error: ClassifiedError) -> Self {
        Self { source_index, outcome: ItemOutcome::Failure(error) }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Success(_))
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.outcome {
            ItemOutcome::Success(data) => Some(data),
            ItemOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        match &self.outcome {
            ItemOutcome::Success(_) => None,
            ItemOutcome::Failure(err) => Some(err),
        }
    }

    /// Wire shape handed back to the host: `{ data, sourceIndex }`.
    ///
    /// Failures become `{ error, kind, statusCode?, description?, requestId?,
    /// code?, details? }` under `data`.
    pub fn to_output(&self) -> ItemOutput {
        let data = match &self.outcome {
            ItemOutcome::Success(data) => data.clone(),
            ItemOutcome::Failure(err) => error_payload(err),
        };
        ItemOutput { data, source_index: self.source_index }
    }
}

/// Serializable form of an [`ItemResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutput {
    pub data: Value,
    pub source_index: usize,
}

fn error_payload(err: &ClassifiedError) -> Value {
    let mut payload = Map::new();
    payload.insert("error".into(), Value::String(err.message().to_string()));
    payload.insert("kind".into(), Value::String(err.kind().label().to_string()));

    if let Some(status) = err.status_code() {
        payload.insert("statusCode".into(), Value::from(status));
    }
    if let Some(description) = err.description() {
        payload.insert("description".into(), Value::String(description.to_string()));
    }
    if let Some(upstream) = err.upstream() {
        if let Some(request_id) = &upstream.request_id {
            payload.insert("requestId".into(), Value::String(request_id.clone()));
        }
        if let Some(code) = &upstream.code {
            payload.insert("code".into(), code.clone());
        }
        if let Some(details) = &upstream.details {
            payload.insert("details".into(), details.clone());
        }
    }

    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::{ErrorKind, UpstreamDetails};

    #[test]
    fn success_output_wraps_response() {
        let output = ItemResult::success(2, json!({ "id": "acc-1" })).to_output();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({ "data": { "id": "acc-1" }, "sourceIndex": 2 })
        );
    }

    #[test]
    fn failure_output_carries_upstream_fields() {
        let err = ClassifiedError::new(ErrorKind::Generic, "Account not found")
            .with_status(Some(404))
            .with_upstream(UpstreamDetails {
                request_id: Some("req-9".into()),
                code: Some(json!("NOT_FOUND")),
                ..Default::default()
            });

        let output = ItemResult::failure(1, err).to_output();
        assert_eq!(output.source_index, 1);
        assert_eq!(
            output.data,
            json!({
                "error": "Account not found",
                "kind": "generic",
                "statusCode": 404,
                "requestId": "req-9",
                "code": "NOT_FOUND"
            })
        );
    }
}
