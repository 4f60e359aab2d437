//! Authenticated request pipeline

pub mod host;
pub mod service;

pub use host::InMemoryHost;
pub use service::{ExecutionError, ExecutionService};
