//! Endpoint catalog
//!
//! A static, data-driven table mapping every `(resource, operation)` pair to
//! an HTTP method, a path template (relative to the configured API prefix) and
//! a list of parameter bindings. Adding an endpoint means adding a row to
//! [`table`]; no request-building code changes.
//!
//! - [`table`] - the endpoint rows
//! - [`builder`] - turns a row plus a [`LogicalRequest`] into an [`HttpRequestSpec`]
//! - [`schema`] - serializable description of the table for host UIs
//!
//! [`LogicalRequest`]: budgetlink_domain::LogicalRequest
//! [`HttpRequestSpec`]: budgetlink_domain::HttpRequestSpec

pub mod builder;
pub mod schema;
pub mod table;

use budgetlink_domain::{ClassifiedError, HttpMethod, Resource};
use serde::Serialize;

pub use builder::build_request;
pub use schema::{FieldSchema, NodeSchema, OperationSchema, ResourceSchema};

/// Where a bound parameter ends up in the outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `{name}` placeholder in the path template
    Path(&'static str),
    /// Dot path inside the JSON body (`account.name`)
    Body(&'static str),
    /// Query-string key
    Query(&'static str),
}

/// Value conversion applied before a parameter is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Pass through unchanged
    Value,
    /// Skip empty strings, objects and arrays
    NonEmpty,
    /// `"a, b,,c"` becomes `["a", "b", "c"]`
    CommaList,
    /// `"*"` or `"custom"`; custom reads a comma list from `custom_source`
    SelectFields { custom_source: &'static str },
    /// JSON filter document, given as a string or an object
    JsonFilter,
    /// ActualQL table name, checked against the whitelist
    QueryTable,
    /// Integer row limit within the allowed range
    QueryLimit,
}

/// Input type of a bound parameter, as shown to host UIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Collection,
    FixedCollection,
    Options,
    Json,
}

/// Declarative routing of one logical parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Dot path into the logical parameters (`filters.start`)
    pub source: &'static str,
    pub target: Target,
    pub transform: Transform,
    pub required: bool,
    pub kind: FieldKind,
    /// Value used when the parameter is absent
    pub default: Option<&'static str>,
}

impl Binding {
    /// Required path segment
    pub const fn path(name: &'static str) -> Self {
        Self {
            source: name,
            target: Target::Path(name),
            transform: Transform::Value,
            required: true,
            kind: FieldKind::String,
            default: None,
        }
    }

    pub const fn body(source: &'static str, target: &'static str, kind: FieldKind) -> Self {
        Self {
            source,
            target: Target::Body(target),
            transform: Transform::Value,
            required: false,
            kind,
            default: None,
        }
    }

    pub const fn query(source: &'static str, target: &'static str, kind: FieldKind) -> Self {
        Self {
            source,
            target: Target::Query(target),
            transform: Transform::Value,
            required: false,
            kind,
            default: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Top-level parameter name the host must resolve for this binding
    pub fn parameter_name(&self) -> &'static str {
        top_level(self.source)
    }
}

fn top_level(path: &'static str) -> &'static str {
    path.split('.').next().unwrap_or(path)
}

/// One row of the catalog
#[derive(Debug, Clone, Copy)]
pub struct EndpointDef {
    pub resource: Resource,
    pub operation: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    /// Path template relative to the API prefix (`/accounts/{accountId}`)
    pub path: &'static str,
    pub bindings: &'static [Binding],
}

impl EndpointDef {
    /// Every top-level parameter this endpoint reads, in binding order
    pub fn parameter_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for binding in self.bindings {
            let mut candidates = vec![binding.parameter_name()];
            if let Transform::SelectFields { custom_source } = binding.transform {
                candidates.push(top_level(custom_source));
            }
            for name in candidates {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// Lookup facade over the static endpoint table
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    endpoints: &'static [EndpointDef],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// Catalog of the Actual Budget REST API
    pub const fn standard() -> Self {
        Self { endpoints: table::ENDPOINTS }
    }

    pub fn endpoints(&self) -> &'static [EndpointDef] {
        self.endpoints
    }

    /// Operations available for a resource, in table order
    pub fn operations(&self, resource: Resource) -> impl Iterator<Item = &'static EndpointDef> {
        self.endpoints.iter().filter(move |endpoint| endpoint.resource == resource)
    }

    /// Find the row for `(resource, operation)`
    ///
    /// # Errors
    ///
    /// Returns a validation error when the pair is not in the table.
    pub fn lookup(
        &self,
        resource: Resource,
        operation: &str,
    ) -> Result<&'static EndpointDef, ClassifiedError> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.resource == resource && endpoint.operation == operation)
            .ok_or_else(|| {
                ClassifiedError::validation(format!(
                    "Unsupported {} operation: {operation}",
                    resource.display_name().to_lowercase()
                ))
            })
    }

    /// Serializable description of the whole catalog
    pub fn schema(&self) -> NodeSchema {
        schema::describe(self)
    }
}

#[cfg(test)]
mod tests {
    use budgetlink_domain::ErrorKind;

    use super::*;

    #[test]
    fn every_resource_has_operations() {
        let catalog = Catalog::standard();
        for resource in Resource::ALL {
            assert!(catalog.operations(resource).next().is_some(), "{resource} has no operations");
        }
    }

    #[test]
    fn operations_are_unique_per_resource() {
        let catalog = Catalog::standard();
        for (i, a) in catalog.endpoints().iter().enumerate() {
            for b in &catalog.endpoints()[i + 1..] {
                assert!(
                    !(a.resource == b.resource && a.operation == b.operation),
                    "duplicate row {}.{}",
                    a.resource,
                    a.operation
                );
            }
        }
    }

    #[test]
    fn path_placeholders_have_path_bindings() {
        for endpoint in Catalog::standard().endpoints() {
            let placeholders = endpoint.path.matches('{').count();
            let bound = endpoint
                .bindings
                .iter()
                .filter(|binding| matches!(binding.target, Target::Path(_)))
                .count();
            assert_eq!(placeholders, bound, "{}.{}", endpoint.resource, endpoint.operation);
        }
    }

    #[test]
    fn unknown_operation_is_validation_error() {
        let err = Catalog::standard().lookup(Resource::Payee, "archive").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "Unsupported payee operation: archive");
    }

    #[test]
    fn parameter_names_include_custom_select_source() {
        let endpoint = Catalog::standard().lookup(Resource::Query, "execute").unwrap();
        let names = endpoint.parameter_names();
        assert!(names.contains(&"select"));
        assert!(names.contains(&"customFields"));
        assert!(names.contains(&"options"));
        assert_eq!(names.iter().filter(|name| **name == "options").count(), 1);
    }
}
