//! Fixed-window rate limiting.
//!
//! The limiter counts requests per client identifier over a fixed window.
//! Window reset is lazy: an idle identifier resets silently on its next
//! request, never via a background timer.
//!
//! State lives behind the [`RateLimitStore`] capability trait so the
//! in-memory registry can be swapped for a distributed backend without
//! touching the gate's logic. The get/put read-modify-write is not atomic:
//! two concurrent checks for the same identifier can both be admitted at the
//! limit boundary. This is a best-effort limiter, not a precise one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A counting window for one client identifier.
///
/// Invariant: `count` reflects only requests observed since `window_start`.
#[derive(Debug, Clone, Copy)]
pub struct WindowEntry {
    pub count: u32,
    pub window_start: Instant,
}

/// Storage capability for rate-limit state.
pub trait RateLimitStore: Send + Sync {
    /// Fetch the entry for an identifier, if one exists.
    fn get(&self, key: &str) -> Option<WindowEntry>;

    /// Store the entry for an identifier, replacing any previous value.
    fn put(&self, key: &str, entry: WindowEntry);
}

/// Process-local store backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl RateLimitStore for MemoryStore {
    fn get(&self, key: &str) -> Option<WindowEntry> {
        let entries = self.entries.lock().expect("rate limit store mutex poisoned");
        entries.get(key).copied()
    }

    fn put(&self, key: &str, entry: WindowEntry) {
        let mut entries = self.entries.lock().expect("rate limit store mutex poisoned");
        entries.insert(key.to_string(), entry);
    }
}

/// The result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The request is admitted. `remaining` feeds `X-RateLimit-Remaining`.
    Allowed { remaining: u32 },
    /// The request is denied. `retry_after` feeds `Retry-After`.
    Denied { retry_after: Duration },
}

/// Fixed-window limiter over an injected store.
pub struct FixedWindowLimiter {
    store: Arc<dyn RateLimitStore>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, max_requests: u32, window: Duration) -> Self {
        Self {
            store,
            max_requests,
            window,
        }
    }

    /// Check a request against the current window.
    pub fn check(&self, key: &str) -> Verdict {
        self.check_at(key, Instant::now())
    }

    /// Check a request at an explicit instant. Exposed for tests so window
    /// expiry can be exercised without sleeping.
    pub fn check_at(&self, key: &str, now: Instant) -> Verdict {
        match self.store.get(key) {
            Some(entry) if now.saturating_duration_since(entry.window_start) <= self.window => {
                if entry.count >= self.max_requests {
                    let reset_at = entry.window_start + self.window;
                    Verdict::Denied {
                        retry_after: reset_at.saturating_duration_since(now),
                    }
                } else {
                    let count = entry.count + 1;
                    self.store.put(
                        key,
                        WindowEntry {
                            count,
                            window_start: entry.window_start,
                        },
                    );
                    Verdict::Allowed {
                        remaining: self.max_requests - count,
                    }
                }
            }
            // Unseen identifier, or window expired: start a fresh window.
            _ => {
                self.store.put(
                    key,
                    WindowEntry {
                        count: 1,
                        window_start: now,
                    },
                );
                Verdict::Allowed {
                    remaining: self.max_requests - 1,
                }
            }
        }
    }
}

/// Round a duration up to whole seconds, for `Retry-After`.
pub fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, window_secs: u64) -> FixedWindowLimiter {
        FixedWindowLimiter::new(
            Arc::new(MemoryStore::default()),
            max,
            Duration::from_secs(window_secs),
        )
    }

    #[test]
    fn test_burst_within_window() {
        let limiter = limiter(3, 60);
        let now = Instant::now();

        assert_eq!(
            limiter.check_at("1.2.3.4", now),
            Verdict::Allowed { remaining: 2 }
        );
        assert_eq!(
            limiter.check_at("1.2.3.4", now),
            Verdict::Allowed { remaining: 1 }
        );
        assert_eq!(
            limiter.check_at("1.2.3.4", now),
            Verdict::Allowed { remaining: 0 }
        );
        assert!(matches!(
            limiter.check_at("1.2.3.4", now),
            Verdict::Denied { .. }
        ));
    }

    #[test]
    fn test_identifiers_are_independent() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        assert!(matches!(
            limiter.check_at("1.2.3.4", now),
            Verdict::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("5.6.7.8", now),
            Verdict::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("1.2.3.4", now),
            Verdict::Denied { .. }
        ));
    }

    #[test]
    fn test_window_reset() {
        let limiter = limiter(1, 60);
        let start = Instant::now();

        assert!(matches!(
            limiter.check_at("5.6.7.8", start),
            Verdict::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("5.6.7.8", start),
            Verdict::Denied { .. }
        ));

        // 61 seconds later the window has expired and the count restarts at 1
        let later = start + Duration::from_secs(61);
        assert_eq!(
            limiter.check_at("5.6.7.8", later),
            Verdict::Allowed { remaining: 0 }
        );
    }

    #[test]
    fn test_retry_after_is_window_remainder() {
        let limiter = limiter(100, 60);
        let start = Instant::now();

        for _ in 0..100 {
            assert!(matches!(
                limiter.check_at("1.2.3.4", start + Duration::from_secs(5)),
                Verdict::Allowed { .. }
            ));
        }

        // Request 101 at second 11. The window opened with the first request
        // at second 5, so it resets at second 65: 54 seconds away.
        match limiter.check_at("1.2.3.4", start + Duration::from_secs(11)) {
            Verdict::Denied { retry_after } => {
                assert_eq!(ceil_secs(retry_after), 54);
            }
            Verdict::Allowed { .. } => panic!("expected denial"),
        }
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_secs(49)), 49);
        assert_eq!(ceil_secs(Duration::from_millis(48_001)), 49);
        assert_eq!(ceil_secs(Duration::ZERO), 0);
    }

    #[test]
    fn test_memory_store_replaces() {
        let store = MemoryStore::default();
        let now = Instant::now();

        assert!(store.get("a").is_none());
        store.put(
            "a",
            WindowEntry {
                count: 1,
                window_start: now,
            },
        );
        assert_eq!(store.get("a").unwrap().count, 1);

        store.put(
            "a",
            WindowEntry {
                count: 7,
                window_start: now,
            },
        );
        assert_eq!(store.get("a").unwrap().count, 7);
    }
}
