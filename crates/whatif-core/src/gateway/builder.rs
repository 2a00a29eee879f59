//! Builder for the provider gateway

use super::orchestrator::ProviderGateway;
use crate::cache::{CacheConfig, ResponseCache};
use crate::config::{ConfigValidator, GatewayConfig};
use crate::error::{WhatIfError, WhatIfResult};
use crate::monitor::{MonitorConfig, UsageMonitor};
use crate::provider::{ChainLink, FallbackChain, HttpProvider};
use crate::rate_limiter::{RateLimitConfig, TokenBucket};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Assembles a [`ProviderGateway`] from configuration or explicit parts
#[derive(Debug)]
pub struct GatewayBuilder {
    rate_limit: RateLimitConfig,
    cache: CacheConfig,
    monitor: MonitorConfig,
    procedural_enabled: bool,
    links: Vec<ChainLink>,
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayBuilder {
    /// Empty chain with default limits
    pub fn new() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            monitor: MonitorConfig::default(),
            procedural_enabled: true,
            links: Vec::new(),
        }
    }

    /// Builder with HTTP links for every enabled provider
    ///
    /// Providers without a resolved API key are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `WhatIfError::Config` if the configuration is invalid or the
    /// HTTP client cannot be constructed.
    pub fn from_config(config: &GatewayConfig) -> WhatIfResult<Self> {
        ConfigValidator::validate(config)?;

        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("whatif/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                WhatIfError::config_with_context(
                    format!("Failed to build HTTP client: {}", e),
                    "Initializing provider gateway",
                )
            })?;

        let mut links = Vec::new();
        for provider in config.enabled_providers() {
            match HttpProvider::from_config(provider, http_client.clone()) {
                Ok(http) => links.push(ChainLink::from_config(provider, Arc::new(http))),
                Err(e) => warn!("Skipping {}: {}", provider.label(), e),
            }
        }

        Ok(Self {
            rate_limit: config.rate_limit.clone(),
            cache: config.cache.clone(),
            monitor: config.monitor.clone(),
            procedural_enabled: config.fallback.procedural_enabled,
            links,
        })
    }

    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    pub fn monitor(mut self, config: MonitorConfig) -> Self {
        self.monitor = config;
        self
    }

    pub fn procedural_fallback(mut self, enabled: bool) -> Self {
        self.procedural_enabled = enabled;
        self
    }

    /// Append a link to the end of the chain
    pub fn link(mut self, link: ChainLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// # Errors
    ///
    /// Returns `WhatIfError::Config` for invalid limits, a per-request cost
    /// above the bucket capacity, or an unusable empty chain.
    pub fn build(self) -> WhatIfResult<ProviderGateway> {
        let bucket = TokenBucket::new(&self.rate_limit)?;
        if self.rate_limit.cost_per_request == 0 || self.rate_limit.cost_per_request > bucket.capacity() {
            return Err(WhatIfError::config(format!(
                "cost_per_request must be between 1 and the bucket capacity ({}), got {}",
                bucket.capacity(),
                self.rate_limit.cost_per_request
            )));
        }
        let cache = ResponseCache::new(&self.cache)?;
        if self.links.is_empty() && !self.procedural_enabled {
            return Err(WhatIfError::config(
                "No usable providers and procedural fallback disabled",
            ));
        }

        info!(
            providers = self.links.len(),
            procedural = self.procedural_enabled,
            "Provider gateway ready"
        );

        Ok(ProviderGateway {
            chain: FallbackChain::new(self.links),
            bucket,
            rate_limit: self.rate_limit,
            cache,
            monitor: UsageMonitor::new(&self.monitor),
            procedural_enabled: self.procedural_enabled,
        })
    }
}
