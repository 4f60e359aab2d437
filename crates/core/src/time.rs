//! Time abstraction for testability
//!
//! Token expiry is wall-clock based (milliseconds since the UNIX epoch), so
//! the clock only exposes that. Use [`SystemClock`] in production and
//! [`MockClock`] in tests.
//!
//! ```
//! use std::time::Duration;
//!
//! use budgetlink_core::time::{Clock, MockClock};
//!
//! let clock = MockClock::at(1_000);
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now_millis(), 6_000);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    /// Milliseconds since the UNIX epoch
    fn now_millis(&self) -> u64;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Manually driven clock for tests
///
/// Clones share the same underlying time, so a clock handed to a cache can
/// still be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    millis: Arc<AtomicU64>,
}

impl MockClock {
    /// Start at the current system time
    pub fn new() -> Self {
        Self::at(SystemClock.now_millis())
    }

    /// Start at a fixed number of milliseconds since the epoch
    pub fn at(millis: u64) -> Self {
        Self { millis: Arc::new(AtomicU64::new(millis)) }
    }

    pub fn advance(&self, duration: Duration) {
        let delta = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set_millis(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_millis() > 0);
    }

    #[test]
    fn mock_clock_clones_share_time() {
        let clock = MockClock::at(10);
        let shared = clock.clone();
        clock.advance(Duration::from_millis(15));
        assert_eq!(shared.now_millis(), 25);

        shared.set_millis(100);
        assert_eq!(clock.now_millis(), 100);
    }
}
