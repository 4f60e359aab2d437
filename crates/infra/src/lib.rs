//! # budgetlink Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpTransport`](budgetlink_core::HttpTransport)
//! - A bearer-token [`AuthenticatedTransport`](budgetlink_core::AuthenticatedTransport)
//!   for OAuth2 hosts
//! - Configuration loading (environment, TOML, JSON)
//! - Logging initialization
//!
//! ## Architecture
//! - Implements traits defined in `budgetlink-core`
//! - Depends on `budgetlink-domain` and `budgetlink-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::*;
pub use observability::init_logging;
