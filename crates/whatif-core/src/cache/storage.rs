//! In-memory LRU storage with per-entry TTL

use super::types::{CacheConfig, CacheEntry, CacheKey, CacheStatistics, MAX_TTL};
use crate::error::{WhatIfError, WhatIfResult};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug)]
struct Inner<V> {
    entries: LruCache<CacheKey, CacheEntry<V>>,
    stats: CacheStatistics,
}

impl<V> Inner<V> {
    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }
        self.stats.expirations += expired.len() as u64;
        expired.len()
    }
}

/// Bounded response cache
///
/// Expired entries are never returned. When full, the least-recently-used
/// live entry is evicted, after expired entries have been swept.
#[derive(Debug)]
pub struct ResponseCache<V> {
    inner: Mutex<Inner<V>>,
    default_ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    /// # Errors
    ///
    /// Returns `WhatIfError::Config` for a zero capacity or a TTL outside
    /// `1..=MAX_TTL`.
    pub fn new(config: &CacheConfig) -> WhatIfResult<Self> {
        let capacity = NonZeroUsize::new(config.capacity)
            .ok_or_else(|| WhatIfError::config("Cache capacity must be at least 1"))?;
        if config.ttl_secs == 0 {
            return Err(WhatIfError::config("Cache TTL must be at least 1 second"));
        }
        if config.ttl_secs > MAX_TTL.as_secs() {
            return Err(WhatIfError::config(format!(
                "Cache TTL must be at most {} seconds, got {}",
                MAX_TTL.as_secs(),
                config.ttl_secs
            )));
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: CacheStatistics {
                    capacity: capacity.get(),
                    ..Default::default()
                },
            }),
            default_ttl: config.ttl(),
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a live entry and mark it most recently used
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let expired = match inner.entries.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.mark_accessed();
                let value = entry.value.clone();
                inner.stats.hits += 1;
                trace!(key = %key, "Cache hit");
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.entries.pop(key);
            inner.stats.expirations += 1;
        }
        inner.stats.misses += 1;
        trace!(key = %key, expired, "Cache miss");
        None
    }

    /// Insert with an explicit TTL
    pub fn put(&self, key: CacheKey, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, ttl);
        let mut inner = self.inner.lock();

        if !inner.entries.contains(&key) && inner.entries.len() >= inner.entries.cap().get() {
            inner.purge_expired(entry.created_at);
        }

        if let Some((evicted, _)) = inner.entries.push(key.clone(), entry) {
            // push returns the replaced entry for an existing key
            if evicted != key {
                inner.stats.evictions += 1;
                trace!(key = %evicted, "Cache evicted least recently used entry");
            }
        }
    }

    /// Insert with the configured default TTL
    pub fn insert(&self, key: CacheKey, value: V) {
        self.put(key, value, self.default_ttl);
    }

    pub fn remove(&self, key: &CacheKey) -> Option<V> {
        self.inner.lock().entries.pop(key).map(|entry| entry.value)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        self.inner
            .lock()
            .entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Sweep expired entries, returning how many were dropped
    pub fn cleanup_expired(&self) -> usize {
        self.inner.lock().purge_expired(Instant::now())
    }

    /// Drop every entry; counters are kept
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> CacheStatistics {
        let inner = self.inner.lock();
        CacheStatistics {
            size: inner.entries.len(),
            ..inner.stats.clone()
        }
    }
}
