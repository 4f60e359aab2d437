//! # budgetlink Domain
//!
//! Data types shared by every budgetlink crate.
//!
//! This crate contains:
//! - Credentials and authentication modes
//! - Logical requests, concrete HTTP request specs and per-item results
//! - The classified error model and the infrastructure error enum
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other budgetlink crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
