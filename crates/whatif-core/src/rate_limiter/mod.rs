//! Token-bucket rate limiting for outbound LLM calls
//!
//! One bucket is owned by the gateway for the process lifetime. Refill, check
//! and decrement happen in a single critical section; waiting happens outside
//! the lock.

mod bucket;
mod types;

#[cfg(test)]
mod tests;

pub use bucket::TokenBucket;
pub use types::{BucketStatus, RateLimitConfig};
