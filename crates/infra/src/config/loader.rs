//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BUDGETLINK_AUTH_MODE`: `jwt` (default) or `oauth2`
//! - `BUDGETLINK_BASE_URL`: API base URL (required for JWT)
//! - `BUDGETLINK_USERNAME` / `BUDGETLINK_PASSWORD`: JWT login (required for JWT)
//! - `BUDGETLINK_OAUTH_AUTH_URL`, `BUDGETLINK_OAUTH_TOKEN_URL`,
//!   `BUDGETLINK_OAUTH_SCOPE`: OAuth2 credential URLs
//! - `BUDGETLINK_OAUTH_ACCESS_TOKEN`: pre-obtained OAuth2 bearer token
//! - `BUDGETLINK_API_PREFIX`: path prefix (default `/v2`)
//! - `BUDGETLINK_TIMEOUT`: request timeout in seconds
//! - `BUDGETLINK_SERIALIZE_LOGINS`: serialize concurrent logins (true/false)
//! - `BUDGETLINK_LOG_LEVEL`, `BUDGETLINK_LOG_FORMAT` (`pretty` or `json`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./budgetlink.toml` or `./budgetlink.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `../config.toml` or `../config.json` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use budgetlink_domain::{
    ApiConfig, AuthConfig, AuthMode, BudgetLinkError, Config, CredentialsConfig, JwtCredentials,
    LogFormat, LoggingConfig, OAuth2Credentials, Result,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `BudgetLinkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The variables required by the selected authentication mode must be
/// present; everything else falls back to defaults.
///
/// # Errors
/// Returns `BudgetLinkError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let mode = match env_opt("BUDGETLINK_AUTH_MODE") {
        Some(value) => parse_auth_mode(&value)?,
        None => AuthMode::Jwt,
    };

    let credentials = match mode {
        AuthMode::Jwt => CredentialsConfig {
            mode,
            jwt: Some(JwtCredentials::new(
                env_var("BUDGETLINK_BASE_URL")?,
                env_var("BUDGETLINK_USERNAME")?,
                env_var("BUDGETLINK_PASSWORD")?,
            )),
            ..Default::default()
        },
        AuthMode::OAuth2 => {
            let oauth2 = OAuth2Credentials {
                base_url: env_opt("BUDGETLINK_BASE_URL"),
                auth_url: env_opt("BUDGETLINK_OAUTH_AUTH_URL"),
                access_token_url: env_opt("BUDGETLINK_OAUTH_TOKEN_URL"),
                scope: env_opt("BUDGETLINK_OAUTH_SCOPE"),
            };
            if oauth2.base_url.is_none()
                && oauth2.auth_url.is_none()
                && oauth2.access_token_url.is_none()
            {
                return Err(BudgetLinkError::Config(
                    "Missing required environment variable: BUDGETLINK_BASE_URL".to_string(),
                ));
            }
            CredentialsConfig {
                mode,
                oauth2: Some(oauth2),
                oauth2_access_token: env_opt("BUDGETLINK_OAUTH_ACCESS_TOKEN"),
                ..Default::default()
            }
        }
    };

    let mut api = ApiConfig::default();
    if let Some(prefix) = env_opt("BUDGETLINK_API_PREFIX") {
        api.api_prefix = prefix;
    }
    if let Some(timeout) = env_opt("BUDGETLINK_TIMEOUT") {
        api.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| BudgetLinkError::Config(format!("Invalid timeout: {}", e)))?;
    }

    let auth = AuthConfig {
        serialize_logins: env_bool("BUDGETLINK_SERIALIZE_LOGINS", true),
        ..Default::default()
    };

    let mut logging = LoggingConfig::default();
    if let Some(level) = env_opt("BUDGETLINK_LOG_LEVEL") {
        logging.level = level;
    }
    if let Some(format) = env_opt("BUDGETLINK_LOG_FORMAT") {
        logging.format = parse_log_format(&format)?;
    }

    Ok(Config { api, auth, logging, credentials })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `BudgetLinkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BudgetLinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BudgetLinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BudgetLinkError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BudgetLinkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BudgetLinkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(BudgetLinkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
        candidates.push(cwd.join("../config.toml"));
        candidates.push(cwd.join("../config.json"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 4] {
    [
        dir.join("budgetlink.toml"),
        dir.join("budgetlink.json"),
        dir.join("config.toml"),
        dir.join("config.json"),
    ]
}

fn parse_auth_mode(value: &str) -> Result<AuthMode> {
    match value.to_ascii_lowercase().as_str() {
        "jwt" => Ok(AuthMode::Jwt),
        "oauth2" => Ok(AuthMode::OAuth2),
        other => Err(BudgetLinkError::Config(format!("Invalid authentication mode: {}", other))),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    match value.to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(BudgetLinkError::Config(format!("Invalid log format: {}", other))),
    }
}

/// Get required environment variable
///
/// # Errors
/// Returns `BudgetLinkError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        BudgetLinkError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; empty values count as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
