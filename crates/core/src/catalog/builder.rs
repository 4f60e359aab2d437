//! Request construction from catalog rows

use std::collections::BTreeMap;

use budgetlink_domain::constants::{
    MAX_QUERY_FILTER_DEPTH, MAX_QUERY_LIMIT, MAX_QUERY_SELECT_FIELDS, MIN_QUERY_LIMIT, QUERY_TABLES,
};
use budgetlink_domain::{ApiConfig, ClassifiedError, HttpRequestSpec, LogicalRequest};
use serde_json::{Map, Value};

use super::{Binding, EndpointDef, Target, Transform};

/// Build the concrete HTTP request for `request` using the catalog row
/// `endpoint`.
///
/// Optional parameters that are absent (or `null`) never reach the body or
/// query string; empty bodies and query strings are omitted entirely.
///
/// # Errors
///
/// - Configuration error when `base_url` is empty
/// - Validation error for missing required parameters or malformed values
pub fn build_request(
    endpoint: &EndpointDef,
    request: &LogicalRequest,
    base_url: &str,
    api: &ApiConfig,
) -> Result<HttpRequestSpec, ClassifiedError> {
    if base_url.trim().is_empty() {
        return Err(ClassifiedError::configuration(
            "Base URL is not configured. Please check your credentials.",
        ));
    }

    let mut path = endpoint.path.to_string();
    let mut body = Map::new();
    let mut query = BTreeMap::new();

    for binding in endpoint.bindings {
        let Some(value) = resolve(binding, request)? else {
            continue;
        };
        match binding.target {
            Target::Path(name) => {
                let segment = scalar_to_string(&value).filter(|segment| !segment.is_empty());
                let Some(segment) = segment else {
                    return Err(missing(binding.source));
                };
                path = path.replace(&format!("{{{name}}}"), &urlencoding::encode(&segment));
            }
            Target::Body(dot_path) => insert_dot_path(&mut body, dot_path, value),
            Target::Query(key) => {
                let rendered = scalar_to_string(&value).ok_or_else(|| {
                    ClassifiedError::validation(format!(
                        "Parameter {} must be a string, number or boolean",
                        binding.source
                    ))
                })?;
                query.insert(key.to_string(), rendered);
            }
        }
    }

    Ok(HttpRequestSpec::new(endpoint.method, api.endpoint_url(base_url, &path))
        .with_body(body)
        .with_query(query))
}

/// Read and transform the value for one binding. `Ok(None)` means "omit".
fn resolve(binding: &Binding, request: &LogicalRequest) -> Result<Option<Value>, ClassifiedError> {
    let fallback = binding.default.map(|value| Value::String(value.to_string()));
    let raw = request
        .parameter(binding.source)
        .filter(|value| !value.is_null())
        .or(fallback.as_ref());

    let Some(raw) = raw else {
        return if binding.required { Err(missing(binding.source)) } else { Ok(None) };
    };

    let value = match binding.transform {
        Transform::Value => Some(raw.clone()),
        Transform::NonEmpty => (!is_empty(raw)).then(|| raw.clone()),
        Transform::CommaList => Some(Value::Array(comma_list(raw, binding.source)?)),
        Transform::SelectFields { custom_source } => Some(select_fields(raw, request, custom_source)?),
        Transform::JsonFilter => parse_filter(raw)?,
        Transform::QueryTable => Some(query_table(raw)?),
        Transform::QueryLimit => query_limit(raw)?,
    };

    match value {
        None if binding.required => Err(missing(binding.source)),
        value => Ok(value),
    }
}

fn missing(name: &str) -> ClassifiedError {
    ClassifiedError::validation(format!("Missing required parameter: {name}"))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Assign `value` at `a.b.c`, creating intermediate objects
fn insert_dot_path(target: &mut Map<String, Value>, dot_path: &str, value: Value) {
    let mut segments = dot_path.split('.').peekable();
    let mut current = target;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
}

fn comma_list(value: &Value, name: &str) -> Result<Vec<Value>, ClassifiedError> {
    match value {
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect()),
        Value::Array(items) => Ok(items.clone()),
        _ => Err(ClassifiedError::validation(format!(
            "Parameter {name} must be a comma-separated string"
        ))),
    }
}

fn select_fields(
    value: &Value,
    request: &LogicalRequest,
    custom_source: &str,
) -> Result<Value, ClassifiedError> {
    match value.as_str() {
        Some("*") => Ok(Value::String("*".to_string())),
        Some("custom") => {
            let fields = request
                .parameter(custom_source)
                .map(|raw| comma_list(raw, custom_source))
                .transpose()?
                .unwrap_or_default();
            if fields.is_empty() {
                return Err(ClassifiedError::validation(
                    "Custom fields are required when select is set to custom",
                ));
            }
            if fields.len() > MAX_QUERY_SELECT_FIELDS {
                return Err(ClassifiedError::validation(format!(
                    "Too many select fields: {} (maximum {MAX_QUERY_SELECT_FIELDS})",
                    fields.len()
                )));
            }
            Ok(Value::Array(fields))
        }
        _ => Err(ClassifiedError::validation(format!(
            "Unsupported select value: {value}. Use \"*\" or \"custom\""
        ))),
    }
}

fn parse_filter(value: &Value) -> Result<Option<Value>, ClassifiedError> {
    let filter = match value {
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => serde_json::from_str::<Value>(s)
            .map_err(|err| ClassifiedError::validation(format!("Invalid filter JSON: {err}")))?,
        other => other.clone(),
    };

    if !filter.is_object() {
        return Err(ClassifiedError::validation("Invalid filter JSON: filter must be a JSON object"));
    }
    let depth = json_depth(&filter);
    if depth > MAX_QUERY_FILTER_DEPTH {
        return Err(ClassifiedError::validation(format!(
            "Invalid filter JSON: nesting depth {depth} exceeds maximum of {MAX_QUERY_FILTER_DEPTH}"
        )));
    }
    Ok(Some(filter))
}

fn json_depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(json_depth).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(json_depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn query_table(value: &Value) -> Result<Value, ClassifiedError> {
    match value.as_str() {
        Some(table) if QUERY_TABLES.contains(&table) => Ok(Value::String(table.to_string())),
        _ => Err(ClassifiedError::validation(format!(
            "Unsupported query table: {value}. Allowed tables: {}",
            QUERY_TABLES.join(", ")
        ))),
    }
}

fn query_limit(value: &Value) -> Result<Option<Value>, ClassifiedError> {
    let limit = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Bool(false) => return Ok(None),
        _ => None,
    };
    match limit {
        // zero means "no limit"
        Some(0) => Ok(None),
        Some(limit) if (MIN_QUERY_LIMIT..=MAX_QUERY_LIMIT).contains(&limit) => {
            Ok(Some(Value::from(limit)))
        }
        _ => Err(ClassifiedError::validation(format!(
            "Query limit must be an integer between {MIN_QUERY_LIMIT} and {MAX_QUERY_LIMIT}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use budgetlink_domain::{ErrorKind, HttpMethod, Resource};
    use serde_json::json;

    use super::*;
    use crate::catalog::Catalog;

    const BASE: &str = "http://localhost:3000/";

    fn build(request: &LogicalRequest) -> Result<HttpRequestSpec, ClassifiedError> {
        let endpoint = Catalog::standard().lookup(request.resource, &request.operation)?;
        build_request(endpoint, request, BASE, &ApiConfig::default())
    }

    #[test]
    fn account_create_nests_body_and_omits_absent_fields() {
        let request = LogicalRequest::new(Resource::Account, "create")
            .with_parameter("accountName", json!("Checking"))
            .with_parameter("offbudget", json!(false));

        let spec = build(&request).unwrap();
        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.url, "http://localhost:3000/v2/accounts");
        assert_eq!(spec.body, Some(json!({ "account": { "name": "Checking", "offbudget": false } })));
        assert!(spec.query.is_none());
    }

    #[test]
    fn path_parameters_are_substituted_and_encoded() {
        let request = LogicalRequest::new(Resource::Budget, "setCategoryBudget")
            .with_parameter("month", json!("2024-01"))
            .with_parameter("categoryId", json!("cat/1"))
            .with_parameter("amount", json!(5000));

        let spec = build(&request).unwrap();
        assert_eq!(spec.url, "http://localhost:3000/v2/budgets/2024-01/categories/cat%2F1/budget");
        assert_eq!(spec.body, Some(json!({ "amount": 5000 })));
    }

    #[test]
    fn missing_path_parameter_is_validation_error() {
        let request = LogicalRequest::new(Resource::Account, "delete").with_parameter("accountId", json!(""));
        let err = build(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "Missing required parameter: accountId");
    }

    #[test]
    fn empty_base_url_is_configuration_error() {
        let endpoint = Catalog::standard().lookup(Resource::Health, "check").unwrap();
        let request = LogicalRequest::new(Resource::Health, "check");
        let err = build_request(endpoint, &request, "", &ApiConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn update_without_fields_sends_no_body() {
        let request = LogicalRequest::new(Resource::Payee, "update")
            .with_parameter("payeeId", json!("p1"))
            .with_parameter("updateFields", json!({}));

        let spec = build(&request).unwrap();
        assert_eq!(spec.method, HttpMethod::Put);
        assert!(spec.body.is_none());

        let request = request.with_parameter("updateFields", json!({ "name": "Grocer" }));
        assert_eq!(build(&request).unwrap().body, Some(json!({ "fields": { "name": "Grocer" } })));
    }

    #[test]
    fn transaction_filters_become_query_parameters() {
        let request = LogicalRequest::new(Resource::Transaction, "getAll")
            .with_parameter("accountId", json!("acc-1"))
            .with_parameter("filters", json!({ "start": "2024-01-01", "end": "" }));

        let spec = build(&request).unwrap();
        assert_eq!(spec.url, "http://localhost:3000/v2/accounts/acc-1/transactions");
        let query = spec.query.unwrap();
        assert_eq!(query.get("start").map(String::as_str), Some("2024-01-01"));
        assert!(!query.contains_key("end"));
        assert!(spec.body.is_none());
    }

    #[test]
    fn transaction_create_flattens_collection_and_options() {
        let request = LogicalRequest::new(Resource::Transaction, "create")
            .with_parameter("accountId", json!("acc-1"))
            .with_parameter("transactions", json!({ "transaction": [{ "amount": -1200 }] }))
            .with_parameter("options", json!({ "learnCategories": false }));

        let spec = build(&request).unwrap();
        assert_eq!(
            spec.body,
            Some(json!({ "transactions": [{ "amount": -1200 }], "learnCategories": false }))
        );
    }

    #[test]
    fn payee_merge_splits_comma_list() {
        let request = LogicalRequest::new(Resource::Payee, "merge")
            .with_parameter("targetId", json!("p1"))
            .with_parameter("mergeIds", json!("p2, p3,,p4 "));

        let spec = build(&request).unwrap();
        assert_eq!(spec.body, Some(json!({ "targetId": "p1", "mergeIds": ["p2", "p3", "p4"] })));
    }

    #[test]
    fn close_maps_transfer_category() {
        let request = LogicalRequest::new(Resource::Account, "close")
            .with_parameter("accountId", json!("acc-1"))
            .with_parameter("transferAccountId", json!("acc-2"))
            .with_parameter("transferCategoryId", json!("cat-9"));

        let spec = build(&request).unwrap();
        assert_eq!(spec.body, Some(json!({ "transferAccountId": "acc-2", "categoryId": "cat-9" })));
    }

    #[test]
    fn query_execute_builds_actualql_body() {
        let request = LogicalRequest::new(Resource::Query, "execute")
            .with_parameter("table", json!("transactions"))
            .with_parameter("select", json!("custom"))
            .with_parameter("customFields", json!("id, amount ,date"))
            .with_parameter("filter", json!(r#"{"amount": {"$lt": 0}}"#))
            .with_parameter("options", json!({ "limit": 25 }));

        let spec = build(&request).unwrap();
        assert_eq!(
            spec.body,
            Some(json!({
                "query": {
                    "table": "transactions",
                    "select": ["id", "amount", "date"],
                    "filter": { "amount": { "$lt": 0 } },
                    "options": { "limit": 25 }
                }
            }))
        );
    }

    #[test]
    fn malformed_filter_names_parse_failure() {
        let request = LogicalRequest::new(Resource::Query, "execute")
            .with_parameter("table", json!("transactions"))
            .with_parameter("filter", json!("{not json"));

        let err = build(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().starts_with("Invalid filter JSON:"));
    }

    #[test]
    fn filter_must_be_shallow_object() {
        let request = LogicalRequest::new(Resource::Query, "execute")
            .with_parameter("table", json!("payees"))
            .with_parameter("filter", json!("[1, 2]"));
        assert_eq!(build(&request).unwrap_err().kind(), ErrorKind::Validation);

        let deep = json!({ "a": { "b": { "c": { "d": { "e": { "f": 1 } } } } } });
        let request = request.with_parameter("filter", json!(deep.to_string()));
        assert!(build(&request).unwrap_err().message().contains("nesting depth"));
    }

    #[test]
    fn query_table_and_limit_are_checked() {
        let base = LogicalRequest::new(Resource::Query, "execute");

        let err = build(&base.clone().with_parameter("table", json!("users"))).unwrap_err();
        assert!(err.message().contains("Unsupported query table"));

        let err = build(
            &base
                .with_parameter("table", json!("accounts"))
                .with_parameter("options", json!({ "limit": 20_000 })),
        )
        .unwrap_err();
        assert!(err.message().contains("between 1 and 10000"));
    }

    #[test]
    fn select_defaults_to_all_fields() {
        let request =
            LogicalRequest::new(Resource::Query, "execute").with_parameter("table", json!("payees"));

        let spec = build(&request).unwrap();
        assert_eq!(spec.body, Some(json!({ "query": { "table": "payees", "select": "*" } })));
    }

    #[test]
    fn zero_limit_is_omitted() {
        for limit in [json!(0), json!("")] {
            let request = LogicalRequest::new(Resource::Query, "execute")
                .with_parameter("table", json!("accounts"))
                .with_parameter("options", json!({ "limit": limit }));

            let spec = build(&request).unwrap();
            assert_eq!(spec.body, Some(json!({ "query": { "table": "accounts", "select": "*" } })));
        }
    }

    #[test]
    fn empty_filter_string_is_omitted() {
        let request = LogicalRequest::new(Resource::Query, "execute")
            .with_parameter("table", json!("accounts"))
            .with_parameter("select", json!("*"))
            .with_parameter("filter", json!("  "));

        let spec = build(&request).unwrap();
        assert_eq!(spec.body, Some(json!({ "query": { "table": "accounts", "select": "*" } })));
    }

    #[test]
    fn every_row_builds_with_representative_parameters() {
        let params = json!({
            "accountId": "acc-1", "transactionId": "tx-1", "month": "2024-02",
            "categoryId": "cat-1", "groupId": "grp-1", "payeeId": "pay-1",
            "accountName": "Checking", "categoryName": "Food", "groupName": "Bills",
            "payeeName": "Shop", "targetId": "pay-1", "mergeIds": "pay-2,pay-3",
            "amount": 100, "flag": true, "table": "accounts", "select": "*",
            "transactions": { "transaction": [{ "amount": 1 }] }
        });
        let Value::Object(parameters) = params else { unreachable!() };

        for endpoint in Catalog::standard().endpoints() {
            let request = LogicalRequest {
                resource: endpoint.resource,
                operation: endpoint.operation.to_string(),
                parameters: parameters.clone(),
            };
            let spec = build_request(endpoint, &request, BASE, &ApiConfig::default())
                .unwrap_or_else(|err| panic!("{}.{}: {err}", endpoint.resource, endpoint.operation));

            assert_eq!(spec.method, endpoint.method);
            assert!(spec.url.starts_with("http://localhost:3000/v2/"), "{}", spec.url);
            assert!(!spec.url.contains('{'), "unsubstituted path: {}", spec.url);
            if let Some(body) = &spec.body {
                assert!(!body.to_string().contains("null"), "null in body: {body}");
            }
        }
    }
}
