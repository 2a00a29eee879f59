//! Uniform provider interface

use crate::error::WhatIfResult;
use async_trait::async_trait;

/// One outbound completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Provider output before JSON extraction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCompletion {
    pub text: String,
    /// Reported prompt tokens, when the provider returns usage
    pub input_tokens: Option<u64>,
    /// Reported completion tokens, when the provider returns usage
    pub output_tokens: Option<u64>,
}

impl RawCompletion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Anything that can turn a prompt into raw text
///
/// Implementations report transport, HTTP, auth and quota failures as
/// `WhatIfError::Provider` or `WhatIfError::ProviderTimeout`. Timeouts are also
/// enforced by the gateway around every call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn call(&self, request: &ProviderRequest) -> WhatIfResult<RawCompletion>;
}
