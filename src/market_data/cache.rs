use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use anyhow::Result;
use parking_lot::RwLock;
use tracing::debug;

use super::history::{PriceHistory, PriceHistoryProvider};

// ---------------------------------------------------------------------------
// TtlCache -- thread-safe key -> (value, expiry) map
// ---------------------------------------------------------------------------

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe map whose entries expire `ttl` after insertion.  Expired
/// entries are evicted lazily on read or explicitly via [`purge_expired`].
///
/// [`purge_expired`]: TtlCache::purge_expired
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return a clone of the live value for `key`, evicting it if expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        {
            let map = self.entries.read();
            match map.get(key) {
                Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Re-check under the write lock; another writer may have refreshed it.
        let mut map = self.entries.write();
        if map.get(key).is_some_and(|entry| now >= entry.expires_at) {
            map.remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries
            .write()
            .insert(key, CacheEntry { value, expires_at });
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut map = self.entries.write();
        let before = map.len();
        map.retain(|_, entry| now < entry.expires_at);
        before - map.len()
    }

    /// Number of stored entries, including any not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// CachedProvider -- memoises another provider for the cache TTL
// ---------------------------------------------------------------------------

pub struct CachedProvider<P> {
    inner: P,
    cache: TtlCache<String, PriceHistory>,
}

impl<P: PriceHistoryProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &TtlCache<String, PriceHistory> {
        &self.cache
    }
}

impl<P: PriceHistoryProvider> PriceHistoryProvider for CachedProvider<P> {
    fn fetch(&self, asset: &str) -> Result<PriceHistory> {
        let key = asset.to_string();
        if let Some(history) = self.cache.get(&key) {
            debug!(asset, "price history cache hit");
            return Ok(history);
        }

        debug!(asset, "price history cache miss");
        let history = self.inner.fetch(asset)?;
        self.cache.insert(key, history.clone());
        Ok(history)
    }
}
