//! Time-bounded memo of the last successful scrape.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// A cached value and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

/// True once `ttl` has fully elapsed since `fetched_at`.
///
/// A clock that went backwards counts as fresh.
pub fn is_expired(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match (now - fetched_at).to_std() {
        Ok(age) => age >= ttl,
        Err(_) => false,
    }
}

/// Single-slot cache with an explicit TTL.
#[derive(Debug, Clone)]
pub struct FetchCache<T> {
    entry: Option<CacheEntry<T>>,
    ttl: Duration,
}

impl<T: Clone> FetchCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value if it is still fresh at `now`.
    pub fn get(&self, now: DateTime<Utc>) -> Option<T> {
        self.entry
            .as_ref()
            .filter(|e| !is_expired(e.fetched_at, now, self.ttl))
            .map(|e| e.value.clone())
    }

    pub fn put(&mut self, value: T, fetched_at: DateTime<Utc>) {
        self.entry = Some(CacheEntry { value, fetched_at });
    }

    pub fn entry(&self) -> Option<&CacheEntry<T>> {
        self.entry.as_ref()
    }

    /// Drop the cached value so the next read goes to the network.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn expiry_boundary() {
        let t0 = Utc::now();
        assert!(!is_expired(t0, t0, HOUR));
        assert!(!is_expired(t0, t0 + TimeDelta::seconds(3599), HOUR));
        assert!(is_expired(t0, t0 + TimeDelta::seconds(3600), HOUR));
        assert!(!is_expired(t0, t0 - TimeDelta::seconds(10), HOUR));
    }

    #[test]
    fn get_respects_ttl_and_invalidate() {
        let t0 = Utc::now();
        let mut cache = FetchCache::new(HOUR);
        assert_eq!(cache.get(t0), None);

        cache.put(vec![1, 2], t0);
        assert_eq!(cache.get(t0 + TimeDelta::minutes(30)), Some(vec![1, 2]));
        assert_eq!(cache.get(t0 + TimeDelta::hours(2)), None);
        assert!(cache.entry().is_some());

        cache.invalidate();
        assert_eq!(cache.get(t0), None);
        assert!(cache.entry().is_none());
    }
}
