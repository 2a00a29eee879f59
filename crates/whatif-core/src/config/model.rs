//! Configuration data model

use super::logging::LoggingConfig;
use crate::cache::CacheConfig;
use crate::error::{WhatIfError, WhatIfResult};
use crate::monitor::MonitorConfig;
use crate::provider::ProviderKind;
use crate::rate_limiter::RateLimitConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration for the gateway and the CLI around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub rate_limit: RateLimitConfig,
    pub cache: CacheConfig,
    /// Fallback chain, tried in order
    pub providers: Vec<ProviderConfig>,
    pub fallback: FallbackConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            providers: default_chain(),
            fallback: FallbackConfig::default(),
            monitor: MonitorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Render as TOML, e.g. for `config init`
    pub fn to_toml_string(&self) -> WhatIfResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Providers that are enabled, in chain order
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }
}

/// Default chain: three models behind OpenRouter
fn default_chain() -> Vec<ProviderConfig> {
    [
        ("anthropic/claude-sonnet-4-5-20250929", 0.003),
        ("openai/gpt-4o", 0.005),
        ("google/gemini-2.0-flash", 0.0001),
    ]
    .into_iter()
    .map(|(model, price)| {
        ProviderConfig::new(ProviderKind::OpenRouter, model).with_price(price)
    })
    .collect()
}

/// Procedural fallback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Use the local generator when the chain is exhausted or rate limited
    pub procedural_enabled: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            procedural_enabled: true,
        }
    }
}

/// One link of the fallback chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    /// Inline API key; prefer `api_key_env`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable to read the key from (defaults per provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// USD per 1K tokens (defaults per provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_1k_tokens: Option<f64>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_enabled() -> bool {
    true
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            kind,
            model: model.into(),
            api_key: None,
            api_key_env: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
            price_per_1k_tokens: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            enabled: true,
        }
    }

    pub fn with_price(mut self, price_per_1k_tokens: f64) -> Self {
        self.price_per_1k_tokens = Some(price_per_1k_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn price_per_1k(&self) -> f64 {
        self.price_per_1k_tokens
            .unwrap_or_else(|| self.kind.default_price_per_1k())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
    }

    pub fn key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.kind.api_key_env())
    }

    /// Display label, e.g. `openrouter:openai/gpt-4o`
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.model)
    }

    /// API key, or a configuration error naming the variable to set
    pub fn require_api_key(&self) -> WhatIfResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            WhatIfError::config_with_context(
                format!("No API key for {}", self.label()),
                format!("Set {} or provide api_key", self.key_env()),
            )
        })
    }
}
