//! Provider identity

use crate::error::WhatIfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire format spoken by a provider's HTTP API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Anthropic Messages API
    AnthropicMessages,
    /// OpenAI-compatible Chat Completions
    ChatCompletions,
    /// Google Gemini `generateContent`
    GeminiGenerate,
}

/// Known LLM providers
///
/// Every link in the fallback chain is tagged with one of these; dialect,
/// endpoint and credentials are resolved per variant with exhaustive matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
    Google,
    Grok,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl ProviderKind {
    /// All providers, in declaration order
    pub const ALL: [ProviderKind; 5] = [
        Self::Anthropic,
        Self::OpenAi,
        Self::Google,
        Self::Grok,
        Self::OpenRouter,
    ];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Grok => "grok",
            Self::OpenRouter => "openrouter",
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Anthropic => Dialect::AnthropicMessages,
            Self::Google => Dialect::GeminiGenerate,
            Self::OpenAi | Self::Grok | Self::OpenRouter => Dialect::ChatCompletions,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Google => "https://generativelanguage.googleapis.com/v1beta",
            Self::Grok => "https://api.x.ai/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
            Self::Grok => "XAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-5-20250929",
            Self::OpenAi => "gpt-4o",
            Self::Google => "gemini-2.0-flash",
            Self::Grok => "grok-beta",
            Self::OpenRouter => "anthropic/claude-sonnet-4-5-20250929",
        }
    }

    /// Default price in USD per 1K tokens
    pub fn default_price_per_1k(&self) -> f64 {
        match self {
            Self::Anthropic => 0.003,
            Self::OpenAi => 0.005,
            Self::Google => 0.0001,
            Self::Grok => 0.005,
            Self::OpenRouter => 0.003,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = WhatIfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "google" | "gemini" => Ok(Self::Google),
            "grok" | "xai" => Ok(Self::Grok),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(WhatIfError::invalid_field(
                "provider",
                format!("Unknown provider: {}", other),
            )),
        }
    }
}
