//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an optional deadline.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Absolute deadline, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn persistent(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates an entry expiring `ttl_seconds` after `now`.
    ///
    /// A TTL of zero produces a deadline equal to `now`, so the entry is
    /// already expired on the next read.
    pub fn expiring(value: String, ttl_seconds: u64, now: Instant) -> Self {
        let expires_at = now
            .checked_add(Duration::from_secs(ttl_seconds))
            .unwrap_or_else(far_future);

        Self {
            value,
            expires_at: Some(expires_at),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the deadline.
    ///
    /// # Returns
    /// - `true` if the entry has a deadline and `now >= deadline`
    /// - `false` if the entry has no deadline or it hasn't been reached
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

// TTLs large enough to overflow the clock are treated as roughly 30 years.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365 * 30)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::persistent("test_value".to_string());

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::expiring("test_value".to_string(), 60, Instant::now());

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::expiring("test_value".to_string(), 1, Instant::now());

        assert!(!entry.is_expired_at(Instant::now()));

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let now = Instant::now();
        let entry = CacheEntry::expiring("test_value".to_string(), 0, now);

        assert_eq!(entry.expires_at, Some(now));
        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::expiring("test".to_string(), 10, now);

        assert!(!entry.is_expired_at(now + Duration::from_millis(9_999)));
        assert!(entry.is_expired_at(now + Duration::from_secs(10)));
        assert!(entry.is_expired_at(now + Duration::from_secs(11)));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::expiring("test_value".to_string(), u64::MAX, Instant::now());

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired_at(Instant::now()));
    }
}
