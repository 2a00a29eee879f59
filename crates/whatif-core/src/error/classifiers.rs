//! Error classification for usage accounting and retry decisions

use super::types::WhatIfError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category of a failed provider attempt
///
/// Stored on every failed `UsageRecord` so the monitoring panel can break
/// failures down without holding on to full error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Call exceeded its timeout
    Timeout,
    /// Connection or transport failure
    Network,
    /// Provider returned 429 or a rate-limit message
    RateLimited,
    /// Provider rejected the credentials
    Auth,
    /// Billing or quota exhausted
    Quota,
    /// Provider-side 5xx
    Server,
    /// Response failed schema validation
    Malformed,
    /// Anything else
    Other,
}

impl ErrorKind {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            402 => Self::Quota,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::RateLimited => "rate_limited",
            Self::Auth => "auth",
            Self::Quota => "quota",
            Self::Server => "server",
            Self::Malformed => "malformed",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

impl WhatIfError {
    /// Classify this error for usage accounting
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProviderTimeout { .. } => ErrorKind::Timeout,
            Self::MalformedResponse { .. } | Self::Json { .. } => ErrorKind::Malformed,
            Self::RateLimitExceeded { .. } => ErrorKind::RateLimited,
            Self::Provider {
                status_code: Some(code),
                ..
            } => ErrorKind::from_status(*code),
            Self::Provider { message, .. } => classify_message(message),
            Self::Io { .. } => ErrorKind::Network,
            _ => ErrorKind::Other,
        }
    }

    /// Whether a later attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Timeout | ErrorKind::Network | ErrorKind::RateLimited | ErrorKind::Server
        )
    }

    /// Whether this error should abort process startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("timed out") || lower.contains("timeout") {
        ErrorKind::Timeout
    } else if lower.contains("rate limit") || lower.contains("too many requests") {
        ErrorKind::RateLimited
    } else if lower.contains("quota") || lower.contains("insufficient") || lower.contains("billing")
    {
        ErrorKind::Quota
    } else if lower.contains("unauthorized") || lower.contains("api key") {
        ErrorKind::Auth
    } else if lower.contains("connect") || lower.contains("dns") || lower.contains("network") {
        ErrorKind::Network
    } else {
        ErrorKind::Other
    }
}
