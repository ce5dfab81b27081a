//! Cache entry type

use std::time::{Duration, Instant};

/// A cached value with its expiry
///
/// Owned by the store; callers only ever receive clones of `value`.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// First instant at which the entry is treated as absent
    pub expires_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Create an entry written at `now` that lives for `ttl`
    pub fn new(value: T, now: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: now + ttl,
        }
    }

    /// Check if entry has expired at `now`
    ///
    /// Expiry is inclusive: an entry is gone once `now >= expires_at`.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Get remaining TTL, `None` once expired
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .checked_duration_since(now)
            .filter(|remaining| !remaining.is_zero())
    }
}
