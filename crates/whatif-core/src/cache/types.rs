//! Cache types and data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Version tag mixed into every fingerprint
const FINGERPRINT_VERSION: &str = "whatif.response.v1";

/// Longest lifetime an entry can have; longer TTLs are clamped to this
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Content-addressed cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Fingerprint a request from its model, mode and prompt
    ///
    /// Fields are normalized, then hashed length-prefixed so that no two
    /// distinct field tuples share an input to the digest.
    pub fn fingerprint(model: &str, mode: &str, prompt: &str) -> Self {
        let model = normalize_model(model);
        let prompt = normalize_prompt(prompt);

        let mut hasher = Sha256::new();
        for field in [FINGERPRINT_VERSION, model.as_str(), mode, prompt.as_str()] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // short form is enough to correlate log lines
        f.write_str(&self.0[..self.0.len().min(12)])
    }
}

/// Trim and collapse internal whitespace runs; case is preserved
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim and lower-case a model identifier
pub fn normalize_model(model: &str) -> String {
    model.trim().to_lowercase()
}

/// Cache entry containing a value and its lifetime
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: Instant,
    pub expires_at: Instant,
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    /// Entry expiring after `ttl`, clamped to [`MAX_TTL`]
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now),
            access_count: 0,
        }
    }

    /// Expired once `now` reaches the expiry instant
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn mark_accessed(&mut self) {
        self.access_count += 1;
    }

    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: usize,
    /// Default time-to-live in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl_secs: 15 * 60,
        }
    }
}

impl CacheConfig {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl_secs: ttl.as_secs(),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStatistics {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// Live entries dropped to make room
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
}

impl CacheStatistics {
    /// Hit rate as a fraction in [0, 1]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
