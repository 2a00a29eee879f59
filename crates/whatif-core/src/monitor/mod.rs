//! Usage and cost monitoring
//!
//! Every provider attempt becomes a [`UsageRecord`]. Cache hits, procedural
//! fallbacks and rate-limit denials are tallied as counters instead.

mod pricing;
mod record;
mod tracker;

#[cfg(test)]
mod tests;

pub use pricing::{TokenUsage, estimate_cost, estimate_tokens};
pub use record::UsageRecord;
pub use tracker::{MonitorConfig, ProviderSummary, UsageMonitor, UsageSummary};
