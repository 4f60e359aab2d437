//! # budgetlink App
//!
//! Command-line host for the execution pipeline.
//!
//! This crate contains:
//! - Workflow files (the items a run executes)
//! - Application context (dependency injection)
//! - Commands behind the `budgetlink` binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the reqwest transports into the core services

pub mod commands;
pub mod context;
pub mod workflow;

// Re-export for convenience
pub use commands::*;
pub use context::AppContext;
pub use workflow::{Workflow, WorkflowItem};
