//! Domain constants
//!
//! Centralized location for API paths, token lifetimes and query limits.

// API path convention (versioned)
pub const DEFAULT_API_PREFIX: &str = "/v2";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_HEALTH_PATH: &str = "/health";

// Token cache
pub const TOKEN_EXPIRY_BUFFER_MS: u64 = 60_000;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
/// Seconds subtracted from `expires_in` when computing the stored expiry
pub const TOKEN_TTL_SAFETY_SECS: u64 = 60;

// HTTP
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("budgetlink/", env!("CARGO_PKG_VERSION"));
pub const CONTENT_TYPE_JSON: &str = "application/json";

// ActualQL query limits
pub const QUERY_TABLES: &[&str] = &[
    "accounts",
    "budget_months",
    "budgets",
    "categories",
    "category_groups",
    "payees",
    "rules",
    "schedules",
    "transactions",
];
pub const MAX_QUERY_SELECT_FIELDS: usize = 50;
pub const MAX_QUERY_FILTER_DEPTH: usize = 5;
pub const MIN_QUERY_LIMIT: u64 = 1;
pub const MAX_QUERY_LIMIT: u64 = 10_000;

// Credential names understood by hosts
pub const JWT_CREDENTIAL_NAME: &str = "actualBudgetRestApiJwtApi";
pub const OAUTH2_CREDENTIAL_NAME: &str = "actualBudgetRestApiOAuth2Api";
