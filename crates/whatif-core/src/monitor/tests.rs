//! Tests for the usage monitor

use super::pricing::TokenUsage;
use super::record::UsageRecord;
use super::tracker::{MonitorConfig, UsageMonitor};
use crate::error::ErrorKind;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_summary_per_provider_counts_and_rates() {
    let monitor = UsageMonitor::default();
    let ms = Duration::from_millis;

    // alpha: 3 successes, 1 failure
    for latency in [100, 200, 300] {
        monitor.record(UsageRecord::success("alpha", ms(latency), TokenUsage::new(100, 100), 0.002));
    }
    monitor.record(UsageRecord::failure("alpha", ms(400), ErrorKind::Timeout));
    // beta: 1 success, 2 failures
    monitor.record(UsageRecord::success("beta", ms(50), TokenUsage::new(500, 500), 0.005));
    monitor.record(UsageRecord::failure("beta", ms(10), ErrorKind::Malformed));
    monitor.record(UsageRecord::failure("beta", ms(30), ErrorKind::Malformed));

    let summary = monitor.summary(None);
    assert_eq!(summary.total_calls, 7);
    assert_eq!(summary.total_successes, 4);
    assert_eq!(summary.total_failures, 3);

    let alpha = &summary.providers["alpha"];
    assert_eq!(alpha.count, 4);
    assert_eq!(alpha.successes, 3);
    assert_eq!(alpha.failures, 1);
    assert_eq!(alpha.success_rate, 0.75);
    assert_eq!(alpha.total_tokens, 600);
    assert!((alpha.total_cost - 0.006).abs() < 1e-12);
    assert_eq!(alpha.avg_latency_ms, 250.0);
    assert_eq!(alpha.errors.get(&ErrorKind::Timeout), Some(&1));

    let beta = &summary.providers["beta"];
    assert_eq!(beta.count, 3);
    assert!((beta.success_rate - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(beta.errors.get(&ErrorKind::Malformed), Some(&2));
    assert_eq!(beta.avg_latency_ms, 30.0);
}

#[test]
fn test_history_cap_drops_oldest() {
    let monitor = UsageMonitor::new(&MonitorConfig { max_history: 3 });
    for n in 0..5 {
        monitor.record(UsageRecord::failure(format!("p{}", n), Duration::ZERO, ErrorKind::Other));
    }
    let providers: Vec<_> = monitor.records().into_iter().map(|r| r.provider).collect();
    assert_eq!(providers, vec!["p2", "p3", "p4"]);
}

#[test]
fn test_summary_window_excludes_old_records() {
    let monitor = UsageMonitor::default();
    let old = Utc::now() - chrono::Duration::hours(2);
    monitor.record(
        UsageRecord::success("alpha", Duration::ZERO, TokenUsage::new(1, 1), 0.0).with_timestamp(old),
    );
    monitor.record(UsageRecord::success("alpha", Duration::ZERO, TokenUsage::new(1, 1), 0.0));

    assert_eq!(monitor.summary(None).total_calls, 2);
    let recent = monitor.summary(Some(Duration::from_secs(3600)));
    assert_eq!(recent.total_calls, 1);
    assert_eq!(recent.window_secs, Some(3600));
}

#[test]
fn test_counters_are_separate_from_records() {
    let monitor = UsageMonitor::default();
    monitor.record_cache_hit();
    monitor.record_cache_hit();
    monitor.record_procedural_fallback();
    monitor.record_rate_limited();

    let summary = monitor.summary(None);
    assert_eq!(summary.total_calls, 0);
    assert_eq!(summary.cache_hits, 2);
    assert_eq!(summary.procedural_fallbacks, 1);
    assert_eq!(summary.rate_limited, 1);
    assert!(monitor.is_empty());

    monitor.reset();
    assert_eq!(monitor.summary(None).cache_hits, 0);
}

#[test]
fn test_record_call_builds_failure_kind() {
    let monitor = UsageMonitor::default();
    monitor.record_call("gamma", Duration::from_millis(5), TokenUsage::default(), 0.0, false, Some(ErrorKind::Auth));
    monitor.record_call("gamma", Duration::from_millis(5), TokenUsage::new(10, 10), 0.01, true, None);

    let records = monitor.records();
    assert_eq!(records[0].error_kind, Some(ErrorKind::Auth));
    assert!(records[1].success);
    assert_eq!(monitor.summary(None).providers["gamma"].success_rate, 0.5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_records_are_not_lost() {
    let monitor = Arc::new(UsageMonitor::default());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let monitor = Arc::clone(&monitor);
            tokio::spawn(async move {
                for n in 0..50 {
                    let provider = if worker % 2 == 0 { "even" } else { "odd" };
                    monitor.record_call(
                        provider,
                        Duration::from_millis(1),
                        TokenUsage::new(1, 1),
                        0.0,
                        n % 5 != 0,
                        Some(ErrorKind::Server),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let summary = monitor.summary(None);
    assert_eq!(summary.total_calls, 400);
    assert_eq!(summary.providers["even"].count, 200);
    assert_eq!(summary.providers["odd"].failures, 40);
    assert_eq!(summary.providers["odd"].success_rate, 0.8);
}

#[test]
fn test_summary_window_past_calendar_start_covers_everything() {
    let monitor = UsageMonitor::default();
    monitor.record(UsageRecord::failure("alpha", Duration::ZERO, ErrorKind::Other));
    monitor.record(UsageRecord::failure("beta", Duration::ZERO, ErrorKind::Other));

    let ages_ago = Duration::from_secs(400_000 * 365 * 86_400);
    let summary = monitor.summary(Some(ages_ago));
    assert_eq!(summary.total_calls, 2);
    assert_eq!(summary.window_secs, Some(ages_ago.as_secs()));

    let summary = monitor.summary(Some(Duration::MAX));
    assert_eq!(summary.total_calls, 2);
}
