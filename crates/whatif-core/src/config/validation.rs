//! Configuration validation

use super::logging::LoggingConfig;
use super::model::GatewayConfig;
use crate::cache::MAX_TTL;
use crate::error::{WhatIfError, WhatIfResult};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    ///
    /// # Errors
    ///
    /// Returns `WhatIfError::Config` naming the first offending field.
    pub fn validate(config: &GatewayConfig) -> WhatIfResult<()> {
        Self::validate_rate_limit(config)?;
        Self::validate_cache(config)?;
        Self::validate_providers(config)?;
        Self::validate_monitor(config)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    pub fn validate_rate_limit(config: &GatewayConfig) -> WhatIfResult<()> {
        let rl = &config.rate_limit;
        if rl.capacity == 0 {
            return Err(WhatIfError::config("rate_limit.capacity must be at least 1"));
        }
        if !rl.refill_rate.is_finite() || rl.refill_rate <= 0.0 {
            return Err(WhatIfError::config(format!(
                "rate_limit.refill_rate must be positive, got {}",
                rl.refill_rate
            )));
        }
        if rl.cost_per_request == 0 {
            return Err(WhatIfError::config(
                "rate_limit.cost_per_request must be at least 1",
            ));
        }
        if rl.cost_per_request > rl.capacity {
            return Err(WhatIfError::config_with_context(
                format!(
                    "rate_limit.cost_per_request ({}) exceeds capacity ({})",
                    rl.cost_per_request, rl.capacity
                ),
                "A request could never be admitted",
            ));
        }
        Ok(())
    }

    pub fn validate_cache(config: &GatewayConfig) -> WhatIfResult<()> {
        if config.cache.capacity == 0 {
            return Err(WhatIfError::config("cache.capacity must be at least 1"));
        }
        if config.cache.ttl_secs == 0 {
            return Err(WhatIfError::config("cache.ttl_secs must be at least 1"));
        }
        if config.cache.ttl_secs > MAX_TTL.as_secs() {
            return Err(WhatIfError::config(format!(
                "cache.ttl_secs must be at most {} (one year), got {}",
                MAX_TTL.as_secs(),
                config.cache.ttl_secs
            )));
        }
        Ok(())
    }

    pub fn validate_providers(config: &GatewayConfig) -> WhatIfResult<()> {
        if config.enabled_providers().next().is_none() && !config.fallback.procedural_enabled {
            return Err(WhatIfError::config(
                "No providers enabled and procedural fallback disabled",
            ));
        }

        for (index, provider) in config.providers.iter().enumerate() {
            let context = format!("providers[{}] ({})", index, provider.label());
            if provider.model.trim().is_empty() {
                return Err(WhatIfError::config_with_context("model must not be empty", context));
            }
            if provider.timeout_secs == 0 {
                return Err(WhatIfError::config_with_context(
                    "timeout_secs must be at least 1",
                    context,
                ));
            }
            if let Some(price) = provider.price_per_1k_tokens {
                if !price.is_finite() || price < 0.0 {
                    return Err(WhatIfError::config_with_context(
                        format!("price_per_1k_tokens must be non-negative, got {}", price),
                        context,
                    ));
                }
            }
            if !(0.0..=2.0).contains(&provider.temperature) {
                return Err(WhatIfError::config_with_context(
                    format!("temperature must be in [0, 2], got {}", provider.temperature),
                    context,
                ));
            }
            if provider.max_tokens == 0 {
                return Err(WhatIfError::config_with_context(
                    "max_tokens must be at least 1",
                    context,
                ));
            }
        }
        Ok(())
    }

    pub fn validate_monitor(config: &GatewayConfig) -> WhatIfResult<()> {
        if config.monitor.max_history == 0 {
            return Err(WhatIfError::config("monitor.max_history must be at least 1"));
        }
        Ok(())
    }

    pub fn validate_logging(logging: &LoggingConfig) -> WhatIfResult<()> {
        if !LoggingConfig::LEVELS.contains(&logging.level.as_str()) {
            return Err(WhatIfError::config(format!(
                "Invalid log level '{}', expected one of {:?}",
                logging.level,
                LoggingConfig::LEVELS
            )));
        }
        Ok(())
    }
}
