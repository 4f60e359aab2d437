//! JWT token cache
//!
//! Tokens are keyed by `(baseUrl, username)` and only served while they stay
//! valid for longer than the expiry buffer. Entries are never evicted in the
//! background; a stale entry simply stops being served until it is
//! overwritten or invalidated.
//!
//! The cache is injected into [`JwtAuthenticator`](super::JwtAuthenticator)
//! rather than living in a global, so tests get an isolated instance and a
//! [`MockClock`](crate::time::MockClock).

use std::collections::HashMap;
use std::fmt;

use budgetlink_domain::constants::TOKEN_EXPIRY_BUFFER_MS;
use parking_lot::RwLock;
use tracing::debug;

use crate::time::{Clock, SystemClock};

/// Cache key for one credential: `"{baseUrl}:{username}"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(base_url: &str, username: &str) -> Self {
        Self(format!("{base_url}:{username}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bearer token and its absolute expiry
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    /// Milliseconds since the UNIX epoch
    pub expires_at_ms: u64,
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}

/// Key-value store with a TTL-with-buffer read policy
pub trait TokenCache: Send + Sync {
    /// Token for `key` if it is still valid beyond the expiry buffer
    fn get_valid(&self, key: &CacheKey) -> Option<String>;

    /// Store (or overwrite) the token for `key`
    fn store(&self, key: CacheKey, token: CachedToken);

    /// Remove the token for `key`, returning whether one was present
    fn invalidate(&self, key: &CacheKey) -> bool;

    /// Current time according to the cache's clock
    fn now_millis(&self) -> u64;
}

/// Process-local [`TokenCache`]
pub struct InMemoryTokenCache<C: Clock = SystemClock> {
    entries: RwLock<HashMap<CacheKey, CachedToken>>,
    clock: C,
    buffer_ms: u64,
}

impl InMemoryTokenCache<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryTokenCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryTokenCache<C> {
    /// Cache with an injected clock and the default 60 second buffer
    pub fn with_clock(clock: C) -> Self {
        Self { entries: RwLock::new(HashMap::new()), clock, buffer_ms: TOKEN_EXPIRY_BUFFER_MS }
    }

    pub fn with_buffer_ms(mut self, buffer_ms: u64) -> Self {
        self.buffer_ms = buffer_ms;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Raw entry, valid or not
    pub fn peek(&self, key: &CacheKey) -> Option<CachedToken> {
        self.entries.read().get(key).cloned()
    }
}

impl<C: Clock> TokenCache for InMemoryTokenCache<C> {
    fn get_valid(&self, key: &CacheKey) -> Option<String> {
        let threshold = self.clock.now_millis().saturating_add(self.buffer_ms);
        let entries = self.entries.read();
        match entries.get(key) {
            Some(cached) if cached.expires_at_ms > threshold => Some(cached.token.clone()),
            Some(_) => {
                debug!(key = %key, "cached token inside expiry buffer");
                None
            }
            None => None,
        }
    }

    fn store(&self, key: CacheKey, token: CachedToken) {
        debug!(key = %key, expires_at_ms = token.expires_at_ms, "caching token");
        self.entries.write().insert(key, token);
    }

    fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = self.entries.write().remove(key).is_some();
        debug!(key = %key, removed, "invalidated cached token");
        removed
    }

    fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::time::MockClock;

    const NOW: u64 = 1_700_000_000_000;

    fn cache() -> (InMemoryTokenCache<MockClock>, MockClock) {
        let clock = MockClock::at(NOW);
        (InMemoryTokenCache::with_clock(clock.clone()), clock)
    }

    fn token(value: &str, expires_at_ms: u64) -> CachedToken {
        CachedToken { token: value.to_string(), expires_at_ms }
    }

    #[test]
    fn key_joins_base_url_and_username() {
        assert_eq!(CacheKey::new("http://a", "bob").as_str(), "http://a:bob");
    }

    #[test]
    fn token_outside_buffer_is_served() {
        let (cache, _) = cache();
        let key = CacheKey::new("http://a", "bob");
        cache.store(key.clone(), token("t1", NOW + 120_000));
        assert_eq!(cache.get_valid(&key).as_deref(), Some("t1"));
    }

    #[test]
    fn token_inside_buffer_is_not_served_but_retained() {
        let (cache, _) = cache();
        let key = CacheKey::new("http://a", "bob");
        cache.store(key.clone(), token("t1", NOW + 30_000));
        assert_eq!(cache.get_valid(&key), None);
        assert!(cache.peek(&key).is_some());
    }

    #[test]
    fn buffer_boundary_is_exclusive() {
        let (cache, clock) = cache();
        let key = CacheKey::new("http://a", "bob");
        cache.store(key.clone(), token("t1", NOW + 60_001));
        assert!(cache.get_valid(&key).is_some());

        clock.advance(Duration::from_millis(1));
        assert!(cache.get_valid(&key).is_none());
    }

    #[test]
    fn keys_do_not_leak_across_users_or_urls() {
        let (cache, _) = cache();
        cache.store(CacheKey::new("http://a", "alice"), token("alice-a", NOW + 600_000));

        assert!(cache.get_valid(&CacheKey::new("http://a", "bob")).is_none());
        assert!(cache.get_valid(&CacheKey::new("http://b", "alice")).is_none());
    }

    #[test]
    fn invalidate_removes_entry() {
        let (cache, _) = cache();
        let key = CacheKey::new("http://a", "bob");
        cache.store(key.clone(), token("t1", NOW + 600_000));

        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        assert!(cache.is_empty());
    }
}
