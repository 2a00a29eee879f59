//! Tests for the token bucket

use super::bucket::TokenBucket;
use super::types::RateLimitConfig;
use crate::error::WhatIfError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn default_bucket() -> TokenBucket {
    TokenBucket::new(&RateLimitConfig::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_denies_eleventh_then_refills_after_two_seconds() {
    let bucket = default_bucket();

    for _ in 0..10 {
        assert!(bucket.acquire(1).unwrap());
    }
    assert!(!bucket.acquire(1).unwrap());

    tokio::time::advance(Duration::from_millis(1999)).await;
    assert!(!bucket.acquire(1).unwrap());

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(bucket.acquire(1).unwrap());
    assert!(!bucket.acquire(1).unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_tokens_never_exceed_capacity() {
    let bucket = default_bucket();
    tokio::time::advance(Duration::from_secs(3600)).await;
    assert_eq!(bucket.available_tokens(), 10.0);

    bucket.acquire(3).unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;
    assert!((bucket.available_tokens() - 7.5).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_failed_acquire_does_not_consume() {
    let bucket = default_bucket();
    assert!(bucket.acquire(8).unwrap());
    assert!(!bucket.acquire(3).unwrap());
    assert!((bucket.available_tokens() - 2.0).abs() < 1e-9);
    assert!(bucket.acquire(2).unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_token_count_stays_in_bounds() {
    let bucket = default_bucket();
    for step in 0..200u32 {
        let _ = bucket.acquire(step % 4 + 1).unwrap();
        let tokens = bucket.available_tokens();
        assert!((0.0..=10.0).contains(&tokens), "tokens out of range: {}", tokens);
        tokio::time::advance(Duration::from_millis(u64::from(step % 7) * 300)).await;
    }
}

#[test]
fn test_cost_above_capacity_is_config_error() {
    let bucket = default_bucket();
    let err = bucket.acquire(11).unwrap_err();
    assert!(matches!(err, WhatIfError::Config { .. }));
    assert!(bucket.time_until_available(11).is_err());
}

#[test]
fn test_invalid_config_rejected() {
    assert!(TokenBucket::new(&RateLimitConfig::new(0, 1.0)).is_err());
    assert!(TokenBucket::new(&RateLimitConfig::new(5, 0.0)).is_err());
    assert!(TokenBucket::new(&RateLimitConfig::new(5, -1.0)).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_time_until_available() {
    let bucket = default_bucket();
    assert_eq!(bucket.time_until_available(1).unwrap(), Duration::ZERO);

    for _ in 0..10 {
        bucket.acquire(1).unwrap();
    }
    assert_eq!(bucket.time_until_available(1).unwrap(), Duration::from_secs(2));
    assert_eq!(bucket.time_until_available(3).unwrap(), Duration::from_secs(6));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(bucket.time_until_available(1).unwrap(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_acquire_within_waits_for_refill() {
    let bucket = default_bucket();
    for _ in 0..10 {
        bucket.acquire(1).unwrap();
    }

    let start = tokio::time::Instant::now();
    assert!(bucket.acquire_within(1, Duration::from_secs(5)).await.unwrap());
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_acquire_within_gives_up_before_deadline() {
    let bucket = default_bucket();
    for _ in 0..10 {
        bucket.acquire(1).unwrap();
    }

    let start = tokio::time::Instant::now();
    assert!(!bucket.acquire_within(1, Duration::from_secs(1)).await.unwrap());
    // gave up immediately instead of sleeping to the deadline
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_acquires_grant_exactly_available() {
    let bucket = Arc::new(TokenBucket::new(&RateLimitConfig::new(10, 0.0001)).unwrap());
    let granted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let bucket = Arc::clone(&bucket);
            let granted = Arc::clone(&granted);
            tokio::spawn(async move {
                if bucket.acquire(1).unwrap() {
                    granted.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(granted.load(Ordering::SeqCst), 10);
    assert!(bucket.available_tokens() < 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_status_reports_percentage() {
    let bucket = default_bucket();
    bucket.acquire(5).unwrap();
    let status = bucket.status();
    assert_eq!(status.capacity, 10);
    assert_eq!(status.refill_rate, 0.5);
    assert!((status.available_tokens - 5.0).abs() < 1e-9);
    assert!((status.percentage - 50.0).abs() < 1e-6);
}
