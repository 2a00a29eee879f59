//! Environment variable-based configuration overrides

use super::model::GatewayConfig;
use crate::error::{WhatIfError, WhatIfResult};
use std::str::FromStr;

/// Apply overrides from the process environment
pub fn load_env_overrides(config: &mut GatewayConfig) -> WhatIfResult<()> {
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Apply `WHATIF_*` overrides and resolve provider API keys
///
/// `lookup` abstracts the environment so overrides can be exercised without
/// mutating process state.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> WhatIfResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = parse_var(&lookup, "WHATIF_RATE_LIMIT_CAPACITY")? {
        config.rate_limit.capacity = v;
    }
    if let Some(v) = parse_var(&lookup, "WHATIF_RATE_LIMIT_REFILL_RATE")? {
        config.rate_limit.refill_rate = v;
    }
    if let Some(v) = parse_var(&lookup, "WHATIF_RATE_LIMIT_MAX_WAIT_MS")? {
        config.rate_limit.max_wait_ms = v;
    }
    if let Some(v) = parse_var(&lookup, "WHATIF_CACHE_CAPACITY")? {
        config.cache.capacity = v;
    }
    if let Some(v) = parse_var(&lookup, "WHATIF_CACHE_TTL_SECS")? {
        config.cache.ttl_secs = v;
    }
    if let Some(v) = lookup("WHATIF_PROCEDURAL_FALLBACK") {
        config.fallback.procedural_enabled = parse_bool("WHATIF_PROCEDURAL_FALLBACK", &v)?;
    }
    if let Some(timeout) = parse_var::<u64, _>(&lookup, "WHATIF_PROVIDER_TIMEOUT_SECS")? {
        for provider in &mut config.providers {
            provider.timeout_secs = timeout;
        }
    }
    if let Some(level) = lookup("WHATIF_LOG_LEVEL") {
        config.logging.level = level.to_lowercase();
    }
    if let Some(v) = parse_var(&lookup, "WHATIF_LOG_FORMAT")? {
        config.logging.format = v;
    }

    for provider in &mut config.providers {
        if provider.api_key.is_none() {
            provider.api_key = lookup(provider.key_env()).filter(|key| !key.trim().is_empty());
        }
    }

    Ok(())
}

fn parse_var<T, F>(lookup: &F, name: &str) -> WhatIfResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            WhatIfError::config_with_context(
                format!("Invalid {} value", name),
                format!("Parsing environment value '{}'", raw),
            )
        }),
    }
}

fn parse_bool(name: &str, raw: &str) -> WhatIfResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(WhatIfError::config_with_context(
            format!("Invalid {} value", name),
            format!("Expected a boolean, got '{}'", raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("WHATIF_RATE_LIMIT_CAPACITY", "20"),
                ("WHATIF_RATE_LIMIT_REFILL_RATE", "2.5"),
                ("WHATIF_CACHE_TTL_SECS", "60"),
                ("WHATIF_PROCEDURAL_FALLBACK", "off"),
                ("WHATIF_PROVIDER_TIMEOUT_SECS", "5"),
                ("WHATIF_LOG_LEVEL", "DEBUG"),
                ("WHATIF_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.rate_limit.capacity, 20);
        assert_eq!(config.rate_limit.refill_rate, 2.5);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(!config.fallback.procedural_enabled);
        assert!(config.providers.iter().all(|p| p.timeout_secs == 5));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_api_keys_resolved_from_provider_env() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, env(&[("OPENROUTER_API_KEY", "sk-or-test")])).unwrap();
        assert!(
            config
                .providers
                .iter()
                .all(|p| p.api_key.as_deref() == Some("sk-or-test"))
        );
    }

    #[test]
    fn test_inline_key_wins_and_blank_key_ignored() {
        let mut config = GatewayConfig::default();
        config.providers[0].api_key = Some("inline".to_string());
        apply_env_overrides(&mut config, env(&[("OPENROUTER_API_KEY", "  ")])).unwrap();
        assert_eq!(config.providers[0].api_key.as_deref(), Some("inline"));
        assert!(config.providers[1].api_key.is_none());
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let mut config = GatewayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("WHATIF_CACHE_CAPACITY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, WhatIfError::Config { .. }));
        assert!(err.to_string().contains("WHATIF_CACHE_CAPACITY"));
    }

    #[test]
    fn test_invalid_bool_is_config_error() {
        let mut config = GatewayConfig::default();
        assert!(
            apply_env_overrides(&mut config, env(&[("WHATIF_PROCEDURAL_FALLBACK", "maybe")]))
                .is_err()
        );
    }
}
