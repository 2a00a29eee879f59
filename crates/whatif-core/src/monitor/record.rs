//! Usage records

use super::pricing::TokenUsage;
use crate::error::ErrorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One provider attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: Uuid,
    /// Chain link label, e.g. `openrouter:openai/gpt-4o`
    pub provider: String,
    pub timestamp: DateTime<Utc>,
    pub latency_ms: u64,
    pub tokens: TokenUsage,
    /// Estimated cost in USD
    pub cost: f64,
    pub success: bool,
    pub error_kind: Option<ErrorKind>,
}

impl UsageRecord {
    pub fn success(
        provider: impl Into<String>,
        latency: Duration,
        tokens: TokenUsage,
        cost: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider: provider.into(),
            timestamp: Utc::now(),
            latency_ms: latency.as_millis() as u64,
            tokens,
            cost,
            success: true,
            error_kind: None,
        }
    }

    /// Failed attempt; failures carry no tokens or cost
    pub fn failure(provider: impl Into<String>, latency: Duration, kind: ErrorKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider: provider.into(),
            timestamp: Utc::now(),
            latency_ms: latency.as_millis() as u64,
            tokens: TokenUsage::default(),
            cost: 0.0,
            success: false,
            error_kind: Some(kind),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
