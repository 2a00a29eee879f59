//! Token bucket implementation

use super::types::{BucketStatus, RateLimitConfig};
use crate::error::{WhatIfError, WhatIfResult};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

/// Tolerance for float drift in refill arithmetic
const EPSILON: f64 = 1e-9;

/// Shortest backoff between admission attempts
const MIN_BACKOFF: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl BucketState {
    fn refill(&mut self, capacity: f64, refill_rate: f64) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_refill = now;
    }
}

/// Thread-safe token bucket
///
/// The token count is a float in `[0, capacity]`. A failed `acquire` never
/// mutates the count.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    refill_rate: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket
    ///
    /// # Errors
    ///
    /// Returns `WhatIfError::Config` for a zero capacity or a non-positive
    /// refill rate.
    pub fn new(config: &RateLimitConfig) -> WhatIfResult<Self> {
        if config.capacity == 0 {
            return Err(WhatIfError::config("Token bucket capacity must be at least 1"));
        }
        if !config.refill_rate.is_finite() || config.refill_rate <= 0.0 {
            return Err(WhatIfError::config(format!(
                "Token bucket refill rate must be positive, got {}",
                config.refill_rate
            )));
        }

        Ok(Self {
            capacity: config.capacity,
            refill_rate: config.refill_rate,
            state: Mutex::new(BucketState {
                tokens: config.capacity as f64,
                last_refill: Instant::now(),
            }),
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    fn check_cost(&self, cost: u32) -> WhatIfResult<f64> {
        if cost > self.capacity {
            return Err(WhatIfError::config_with_context(
                format!("Requested {} tokens but bucket capacity is {}", cost, self.capacity),
                "A request costing more than the capacity can never be granted",
            ));
        }
        Ok(cost as f64)
    }

    /// Try to take `cost` tokens without waiting
    pub fn acquire(&self, cost: u32) -> WhatIfResult<bool> {
        let cost = self.check_cost(cost)?;
        let mut state = self.state.lock();
        state.refill(self.capacity as f64, self.refill_rate);

        if state.tokens + EPSILON >= cost {
            state.tokens = (state.tokens - cost).max(0.0);
            trace!(remaining = state.tokens, "Rate limiter: granted {} token(s)", cost);
            Ok(true)
        } else {
            trace!(available = state.tokens, "Rate limiter: denied {} token(s)", cost);
            Ok(false)
        }
    }

    /// Time until `cost` tokens would be available; zero if available now
    pub fn time_until_available(&self, cost: u32) -> WhatIfResult<Duration> {
        let cost = self.check_cost(cost)?;
        let mut state = self.state.lock();
        state.refill(self.capacity as f64, self.refill_rate);

        let deficit = cost - state.tokens;
        if deficit <= EPSILON {
            Ok(Duration::ZERO)
        } else {
            Ok(Duration::from_secs_f64(deficit / self.refill_rate))
        }
    }

    /// Acquire `cost` tokens, backing off for at most `max_wait`
    ///
    /// Returns `Ok(false)` as soon as it is clear the tokens cannot arrive
    /// before the deadline. The lock is never held while sleeping.
    pub async fn acquire_within(&self, cost: u32, max_wait: Duration) -> WhatIfResult<bool> {
        let deadline = Instant::now() + max_wait;
        loop {
            if self.acquire(cost)? {
                return Ok(true);
            }

            let wait = self.time_until_available(cost)?.max(MIN_BACKOFF);
            if Instant::now() + wait > deadline {
                return Ok(false);
            }

            debug!("Rate limiter: waiting {:.3}s for {} token(s)", wait.as_secs_f64(), cost);
            sleep(wait).await;
        }
    }

    /// Current token count after refill
    pub fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock();
        state.refill(self.capacity as f64, self.refill_rate);
        state.tokens
    }

    pub fn status(&self) -> BucketStatus {
        let available_tokens = self.available_tokens();
        BucketStatus {
            available_tokens,
            capacity: self.capacity,
            refill_rate: self.refill_rate,
            percentage: available_tokens / self.capacity as f64 * 100.0,
        }
    }
}
