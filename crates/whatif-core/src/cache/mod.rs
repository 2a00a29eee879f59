//! TTL + LRU response cache
//!
//! Entries are addressed by a SHA-256 fingerprint of the normalized request
//! (model, mode, prompt). All operations take one internal lock, so a value is
//! visible only once fully inserted and a hit updates recency atomically.

mod storage;
mod types;


pub use storage::ResponseCache;
pub use types::{
    CacheConfig, CacheEntry, CacheKey, CacheStatistics, MAX_TTL, normalize_model, normalize_prompt,
};
