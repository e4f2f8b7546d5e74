//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

/// Longest lifetime an entry can have (30 years). Longer TTLs, up to
/// `Duration::MAX`, are clamped to it and effectively never expire.
pub const MAX_TTL: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Returns `now + ttl`, with `ttl` clamped to [`MAX_TTL`] so the addition
/// cannot overflow the clock.
pub fn deadline_after(ttl: Duration) -> Instant {
    Instant::now() + ttl.min(MAX_TTL)
}

// == Cache Entry ==
/// A single cached value and the instant it goes stale.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant (monotonic clock)
    expires_at: Instant,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: deadline_after(ttl),
        }
    }

    // == Touch ==
    /// Resets the deadline to `now + ttl`.
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = deadline_after(ttl);
    }

    /// Returns the expiration instant.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: the entry is expired once `now >= expires_at`, so a
    /// zero TTL produces an entry that is never visible.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant, so a sweep can use
    /// one consistent "now" for every entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("test_value", Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = Entry::new("test_value", Duration::from_millis(50));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = Entry::new(1u32, Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = Entry::new((), Duration::from_secs(10));

        assert!(!entry.is_expired_at(entry.expires_at() - Duration::from_millis(1)));
        assert!(
            entry.is_expired_at(entry.expires_at()),
            "Entry should be expired at boundary"
        );
    }

    #[test]
    fn test_touch_extends_deadline() {
        let mut entry = Entry::new("v", Duration::from_millis(50));
        let first_deadline = entry.expires_at();

        entry.touch(Duration::from_secs(60));

        assert!(entry.expires_at() > first_deadline);
        assert!(entry.ttl_remaining() > Duration::from_secs(59));
    }

    #[test]
    fn test_touch_can_shorten_deadline() {
        let mut entry = Entry::new("v", Duration::from_secs(60));
        entry.touch(Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_max_duration_ttl_is_clamped() {
        let mut entry = Entry::new("forever", Duration::MAX);
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining() > MAX_TTL - Duration::from_secs(1));
        assert!(entry.ttl_remaining() <= MAX_TTL);

        entry.touch(Duration::MAX);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = Entry::new("v", Duration::from_secs(10));

        let remaining = entry.ttl_remaining();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = Entry::new("v", Duration::from_millis(10));

        sleep(Duration::from_millis(30));

        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }
}
