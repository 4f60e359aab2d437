//! Error conversions at the infrastructure boundary

mod conversions;

pub use conversions::{InfraError, IntoUpstreamFailure};
