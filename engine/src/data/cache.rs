use dashmap::DashMap;
use shared::models::{Interval, Period};
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A thread-safe cache with TTL support.
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Identity of a batch fetch: the same symbols, lookback and interval always
/// produce the same data within the TTL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey {
    symbols: Vec<String>,
    period: Period,
    interval: Interval,
}

impl BatchKey {
    pub fn new(symbols: &[String], period: Period, interval: Interval) -> Self {
        let mut symbols = symbols.to_vec();
        symbols.sort();
        symbols.dedup();
        Self {
            symbols,
            period,
            interval,
        }
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            default_ttl,
        }
    }

    /// Returns the value if present and fresh; stale entries are evicted.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    pub fn set(&self, key: K, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    /// Remove all expired entries from the cache.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Entry count, expired entries included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
