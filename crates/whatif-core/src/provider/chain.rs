//! Ordered fallback chain

use super::kind::ProviderKind;
use super::traits::{LlmProvider, ProviderRequest};
use crate::cache::normalize_model;
use crate::config::ProviderConfig;
use crate::gateway::ModelPreferences;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One provider/model pair in the chain
#[derive(Clone)]
pub struct ChainLink {
    pub kind: ProviderKind,
    pub model: String,
    pub timeout: Duration,
    pub price_per_1k: f64,
    pub max_tokens: u32,
    pub temperature: f32,
    provider: Arc<dyn LlmProvider>,
}

impl fmt::Debug for ChainLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainLink")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("price_per_1k", &self.price_per_1k)
            .finish_non_exhaustive()
    }
}

impl ChainLink {
    pub fn new(kind: ProviderKind, model: impl Into<String>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            kind,
            model: model.into(),
            timeout: Duration::from_secs(30),
            price_per_1k: kind.default_price_per_1k(),
            max_tokens: 1024,
            temperature: 0.7,
            provider,
        }
    }

    /// Link with settings taken from configuration
    pub fn from_config(config: &ProviderConfig, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            kind: config.kind,
            model: config.model.clone(),
            timeout: config.timeout(),
            price_per_1k: config.price_per_1k(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            provider,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_price(mut self, price_per_1k: f64) -> Self {
        self.price_per_1k = price_per_1k;
        self
    }

    /// Label used in usage records and logs
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.model)
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn request(&self, prompt: &str) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Immutable ordered list of links
#[derive(Debug, Clone, Default)]
pub struct FallbackChain {
    links: Vec<ChainLink>,
}

impl FallbackChain {
    pub fn new(links: Vec<ChainLink>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links in the order a request should try them
    ///
    /// Links named by the preferences move to the front in preference order
    /// (models before provider kinds); the rest keep chain order. With
    /// `exclusive`, unmatched links are dropped.
    pub fn ordered(&self, preferences: &ModelPreferences) -> Vec<&ChainLink> {
        if preferences.is_empty() {
            return self.links.iter().collect();
        }

        let models: Vec<String> = preferences.models.iter().map(|m| normalize_model(m)).collect();
        let rank = |link: &ChainLink| -> Option<usize> {
            let model = normalize_model(&link.model);
            models
                .iter()
                .position(|m| *m == model)
                .or_else(|| {
                    preferences
                        .providers
                        .iter()
                        .position(|k| *k == link.kind)
                        .map(|p| models.len() + p)
                })
        };

        let mut ranked: Vec<(Option<usize>, &ChainLink)> =
            self.links.iter().map(|link| (rank(link), link)).collect();
        if preferences.exclusive {
            ranked.retain(|(r, _)| r.is_some());
        }
        ranked.sort_by_key(|(r, _)| r.unwrap_or(usize::MAX));
        ranked.into_iter().map(|(_, link)| link).collect()
    }
}
