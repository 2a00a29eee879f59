//! Rate limiter configuration and status types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token bucket configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum tokens held by the bucket
    pub capacity: u32,
    /// Tokens added per second
    pub refill_rate: f64,
    /// Tokens charged per top-level generation request
    pub cost_per_request: u32,
    /// How long a denied request may wait for tokens before falling through
    pub max_wait_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            refill_rate: 0.5,
            cost_per_request: 1,
            max_wait_ms: 0,
        }
    }
}

impl RateLimitConfig {
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
            ..Default::default()
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait_ms = max_wait.as_millis() as u64;
        self
    }

    pub fn with_cost_per_request(mut self, cost: u32) -> Self {
        self.cost_per_request = cost;
        self
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

/// Point-in-time view of the bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStatus {
    pub available_tokens: f64,
    pub capacity: u32,
    pub refill_rate: f64,
    /// Fill level, 0-100
    pub percentage: f64,
}
