//! Time-bounded cache of off-chain prices.
//!
//! Metric functions never consult the cache, callers look prices up here
//! and pass them in explicitly.

use std::{future::Future, time::Duration};

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::trace;

use crate::num::FixedPoint;

/// Default time a fetched price stays valid.
pub const DEFAULT_PRICE_TTL: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug)]
struct CachedPrice {
    price: FixedPoint,
    fetched_at: Instant,
}

/// Prices keyed by an identifier of the priced asset (e.g. `"ETH/USD"`).
///
/// Entries older than the TTL are never returned. The cache can be shared
/// between tasks by reference.
#[derive(Debug)]
pub struct PriceCache {
    entries: DashMap<String, CachedPrice>,
    ttl: Duration,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_TTL)
    }
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Price cached for `key` if it is still fresh. Stale entries are evicted.
    pub fn get(&self, key: &str) -> Option<FixedPoint> {
        let entry = *self.entries.get(key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            return Some(entry.price);
        }
        self.entries
            .remove_if(key, |_, cached| cached.fetched_at == entry.fetched_at);
        trace!(key, "stale price evicted");
        None
    }

    pub fn insert(&self, key: impl Into<String>, price: FixedPoint) {
        self.entries.insert(
            key.into(),
            CachedPrice {
                price,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of entries, including stale ones not evicted yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the fresh price for `key` or fetches and caches a new one.
    ///
    /// Failed fetches are not cached. Concurrent callers missing the same key
    /// may fetch it more than once, the last one to finish wins.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, fetch: F) -> Result<FixedPoint, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FixedPoint, E>>,
    {
        if let Some(price) = self.get(key) {
            return Ok(price);
        }
        let price = fetch().await?;
        self.insert(key, price);
        trace!(key, %price, "price cached");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = PriceCache::new(Duration::from_secs(60));
        cache.insert("ETH/USD", fp("2000"));
        assert_eq!(cache.get("ETH/USD"), Some(fp("2000")));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("ETH/USD"), Some(fp("2000")));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("ETH/USD"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_try_insert_with() {
        let cache = PriceCache::default();
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok::<_, &str>(fp("1.25"))
        };

        assert_eq!(assert_ok!(cache.get_or_try_insert_with("UMA/USD", fetch).await), fp("1.25"));
        assert_eq!(assert_ok!(cache.get_or_try_insert_with("UMA/USD", fetch).await), fp("1.25"));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        tokio::time::advance(DEFAULT_PRICE_TTL).await;
        assert_ok!(cache.get_or_try_insert_with("UMA/USD", fetch).await);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = PriceCache::default();
        assert_err!(
            cache
                .get_or_try_insert_with("UMA/USD", || async { Err::<FixedPoint, _>("feed down") })
                .await
        );
        assert!(cache.get("UMA/USD").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalidate() {
        let cache = PriceCache::new(Duration::from_secs(3600));
        cache.insert("ETH/USD", fp("2000"));
        cache.insert("UMA/USD", fp("10"));
        cache.invalidate("ETH/USD");
        assert_eq!(cache.get("ETH/USD"), None);
        assert_eq!(cache.get("UMA/USD"), Some(fp("10")));
    }
}
