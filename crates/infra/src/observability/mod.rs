//! Logging initialization
//!
//! Installs a `tracing-subscriber` registry for the binary. Library code only
//! emits `tracing` events; it never installs a subscriber itself.

use budgetlink_domain::{BudgetLinkError, LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over config)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Output always goes to stderr; stdout carries run results.
///
/// # Errors
/// Returns `BudgetLinkError::Config` if the level is not a valid filter or a
/// global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), BudgetLinkError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            BudgetLinkError::Config(format!("Invalid log level '{}': {}", config.level, e))
        })?,
    };

    let format = format_override(std::env::var("LOG_FORMAT").ok().as_deref())
        .unwrap_or(config.format);

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| BudgetLinkError::Config(format!("Failed to install logger: {}", e)))
}

fn format_override(value: Option<&str>) -> Option<LogFormat> {
    match value?.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_override_accepts_known_names() {
        assert_eq!(format_override(Some("JSON")), Some(LogFormat::Json));
        assert_eq!(format_override(Some("human")), Some(LogFormat::Pretty));
        assert_eq!(format_override(Some("xml")), None);
        assert_eq!(format_override(None), None);
    }
}
