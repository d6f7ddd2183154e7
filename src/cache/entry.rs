//! Cache entry with expiration.

use std::time::Duration;

use tokio::time::Instant;

use crate::resilience::timeouts::deadline_after;

/// A stored value and the instant it stops being visible.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Create an entry that expires `ttl` from now.
    ///
    /// A `ttl` too large to represent never expires in practice.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: deadline_after(Instant::now(), ttl),
        }
    }

    /// True once `now` has reached the expiry instant.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Time left before expiry, zero if already expired.
    pub fn remaining_ttl(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new("data", Duration::from_secs(300));
        assert!(!entry.is_expired());
        assert_eq!(entry.remaining_ttl(), Duration::from_secs(300));

        tokio::time::advance(Duration::from_secs(100)).await;
        assert_eq!(entry.remaining_ttl(), Duration::from_secs(200));

        tokio::time::advance(Duration::from_secs(200)).await;
        assert!(entry.is_expired());
        assert_eq!(entry.remaining_ttl(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new("data", Duration::MAX);
        assert!(!entry.is_expired());
        assert!(entry.remaining_ttl() > Duration::from_secs(86400 * 365));
    }
}
