//! # budgetlink Core
//!
//! Business logic for driving the Actual Budget REST API from workflow steps.
//! No HTTP client code lives here.
//!
//! This crate contains:
//! - The endpoint catalog and request builder
//! - Base URL resolution, JWT login and the token cache
//! - Classification of upstream failures
//! - The per-item execution pipeline
//! - Port interfaces (traits) implemented by infra and by hosts
//!
//! ## Architecture Principles
//! - Only depends on `budgetlink-domain`
//! - All I/O goes through [`HttpTransport`] / [`AuthenticatedTransport`]
//! - Time comes from an injectable [`time::Clock`]

pub mod auth;
pub mod catalog;
pub mod classify;
pub mod pipeline;
pub mod time;

// Ports
pub mod host_ports;
pub mod transport_ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{resolve_base_url, CacheKey, CachedToken, InMemoryTokenCache, JwtAuthenticator, TokenCache};
pub use catalog::{build_request, Catalog, EndpointDef, NodeSchema};
pub use classify::{classify_login_failure, classify_request_failure};
pub use host_ports::ExecutionHost;
pub use pipeline::{ExecutionError, ExecutionService, InMemoryHost};
pub use transport_ports::{AuthenticatedTransport, HttpTransport};
