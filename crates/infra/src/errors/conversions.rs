//! Conversions from external infrastructure errors into domain errors.

use budgetlink_domain::{BudgetLinkError, UpstreamFailure};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BudgetLinkError);

impl From<InfraError> for BudgetLinkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BudgetLinkError> for InfraError {
    fn from(value: BudgetLinkError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBudgetLinkError {
    fn into_budgetlink(self) -> BudgetLinkError;
}

/// Describe a failed exchange as the opaque payload the classifier reads.
pub trait IntoUpstreamFailure {
    fn into_upstream_failure(self) -> UpstreamFailure;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BudgetLinkError */
/* -------------------------------------------------------------------------- */

impl IntoBudgetLinkError for HttpError {
    fn into_budgetlink(self) -> BudgetLinkError {
        if self.is_timeout() {
            return BudgetLinkError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return BudgetLinkError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return BudgetLinkError::Config(format!("invalid HTTP client settings: {self}"));
        }

        BudgetLinkError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_budgetlink())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → UpstreamFailure */
/* -------------------------------------------------------------------------- */

impl IntoUpstreamFailure for HttpError {
    fn into_upstream_failure(self) -> UpstreamFailure {
        if self.is_timeout() {
            return UpstreamFailure::transport("HTTP request timed out");
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return UpstreamFailure::transport(format!("HTTP connection failure: {self}"));
        }

        UpstreamFailure::transport(self.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
