//! Core error type

use std::time::Duration;
use thiserror::Error;

/// Result type alias for gateway operations
pub type WhatIfResult<T> = Result<T, WhatIfError>;

/// Main error type for the What If gateway
///
/// Per-provider variants (`ProviderTimeout`, `Provider`, `MalformedResponse`)
/// never reach the caller of `ProviderGateway::generate` while procedural
/// fallback is enabled; they are recorded and converted into the next step of
/// the fallback chain.
#[derive(Error, Debug, Clone)]
pub enum WhatIfError {
    /// Configuration is invalid; fatal at startup
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The token bucket denied admission
    #[error("Rate limit exceeded, retry in {:.1}s", retry_after.as_secs_f64())]
    RateLimitExceeded { retry_after: Duration },

    /// A provider call did not finish within its timeout
    #[error("Provider {provider} timed out after {}s", timeout.as_secs())]
    ProviderTimeout { provider: String, timeout: Duration },

    /// HTTP, authentication, quota or transport failure reported by a provider
    #[error("Provider {provider} error: {message}")]
    Provider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Provider answered but the payload failed schema validation
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    /// Every link of the fallback chain failed
    #[error("All providers exhausted after {attempts} attempt(s)")]
    AllProvidersExhausted { attempts: usize },

    /// Request was not well-formed
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Request was cancelled before completion
    #[error("Request was cancelled")]
    Cancelled,

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },
}
