//! Constructor methods for WhatIfError

use super::types::WhatIfError;
use std::time::Duration;

impl WhatIfError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a rate-limit error carrying the suggested backoff
    pub fn rate_limited(retry_after: Duration) -> Self {
        Self::RateLimitExceeded { retry_after }
    }

    /// Create a provider timeout error
    pub fn timeout(provider: impl Into<String>, timeout: Duration) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
            timeout,
        }
    }

    /// Create a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a provider error with an HTTP status code
    pub fn provider_status(
        provider: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an exhaustion error
    pub fn exhausted(attempts: usize) -> Self {
        Self::AllProvidersExhausted { attempts }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error for a specific field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }
}
