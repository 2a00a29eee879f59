//! Usage monitor

use super::pricing::TokenUsage;
use super::record::UsageRecord;
use crate::error::ErrorKind;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Rolling history cap; the oldest record is dropped beyond this
    pub max_history: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { max_history: 1000 }
    }
}

/// Aggregate for one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub count: u64,
    pub successes: u64,
    pub failures: u64,
    pub success_rate: f64,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub avg_latency_ms: f64,
    pub errors: BTreeMap<ErrorKind, u64>,
}

impl ProviderSummary {
    fn add(&mut self, record: &UsageRecord) {
        // avg_latency_ms holds the running sum until finish()
        self.count += 1;
        self.avg_latency_ms += record.latency_ms as f64;
        if record.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        if let Some(kind) = record.error_kind {
            *self.errors.entry(kind).or_default() += 1;
        }
        self.total_cost += record.cost;
        self.total_tokens += record.tokens.total();
    }

    fn finish(&mut self) {
        if self.count > 0 {
            self.success_rate = self.successes as f64 / self.count as f64;
            self.avg_latency_ms /= self.count as f64;
        }
    }
}

/// Snapshot for a monitoring panel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub providers: BTreeMap<String, ProviderSummary>,
    pub total_calls: u64,
    pub total_successes: u64,
    pub total_failures: u64,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub cache_hits: u64,
    pub procedural_fallbacks: u64,
    pub rate_limited: u64,
    /// Window the summary covers; `None` means the whole retained history
    pub window_secs: Option<u64>,
}

impl UsageSummary {
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.total_successes as f64 / self.total_calls as f64
        }
    }
}

/// Thread-safe usage monitor
///
/// Appends are O(1) under a short lock. `summary` copies the relevant records
/// under the lock and aggregates after releasing it.
#[derive(Debug)]
pub struct UsageMonitor {
    records: Mutex<VecDeque<UsageRecord>>,
    max_history: usize,
    cache_hits: AtomicU64,
    procedural_fallbacks: AtomicU64,
    rate_limited: AtomicU64,
}

impl Default for UsageMonitor {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

impl UsageMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        let max_history = config.max_history.max(1);
        Self {
            records: Mutex::new(VecDeque::with_capacity(max_history.min(1024))),
            max_history,
            cache_hits: AtomicU64::new(0),
            procedural_fallbacks: AtomicU64::new(0),
            rate_limited: AtomicU64::new(0),
        }
    }

    /// Append a record, dropping the oldest beyond the history cap
    pub fn record(&self, record: UsageRecord) {
        let mut records = self.records.lock();
        if records.len() >= self.max_history {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Convenience wrapper building the record from its parts
    pub fn record_call(
        &self,
        provider: &str,
        latency: Duration,
        tokens: TokenUsage,
        cost: f64,
        success: bool,
        error_kind: Option<ErrorKind>,
    ) {
        let record = if success {
            UsageRecord::success(provider, latency, tokens, cost)
        } else {
            UsageRecord::failure(provider, latency, error_kind.unwrap_or(ErrorKind::Other))
        };
        self.record(record);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_procedural_fallback(&self) {
        self.procedural_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the retained records, oldest first
    pub fn records(&self) -> Vec<UsageRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Aggregate records, optionally restricted to the last `window`.
    /// A window reaching past the earliest representable time covers the whole history.
    pub fn summary(&self, window: Option<Duration>) -> UsageSummary {
        let cutoff = window
            .and_then(|w| chrono::Duration::from_std(w).ok())
            .and_then(|w| Utc::now().checked_sub_signed(w));

        let snapshot: Vec<UsageRecord> = {
            let records = self.records.lock();
            records
                .iter()
                .filter(|r| cutoff.is_none_or(|cutoff| r.timestamp >= cutoff))
                .cloned()
                .collect()
        };

        let mut summary = UsageSummary {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            procedural_fallbacks: self.procedural_fallbacks.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            window_secs: window.map(|w| w.as_secs()),
            ..Default::default()
        };

        for record in &snapshot {
            summary
                .providers
                .entry(record.provider.clone())
                .or_default()
                .add(record);
            summary.total_calls += 1;
            if record.success {
                summary.total_successes += 1;
            } else {
                summary.total_failures += 1;
            }
            summary.total_cost += record.cost;
            summary.total_tokens += record.tokens.total();
        }
        for provider in summary.providers.values_mut() {
            provider.finish();
        }
        summary
    }

    /// Drop all records and reset counters
    pub fn reset(&self) {
        self.records.lock().clear();
        self.cache_hits.store(0, Ordering::Relaxed);
        self.procedural_fallbacks.store(0, Ordering::Relaxed);
        self.rate_limited.store(0, Ordering::Relaxed);
    }
}
