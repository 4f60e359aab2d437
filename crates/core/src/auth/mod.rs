//! Credential handling: base URL resolution, JWT login and the token cache

pub mod authenticator;
pub mod base_url;
pub mod token_cache;

pub use authenticator::JwtAuthenticator;
pub use base_url::resolve_base_url;
pub use token_cache::{CacheKey, CachedToken, InMemoryTokenCache, TokenCache};
