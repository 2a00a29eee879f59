//! Configuration management commands

use crate::console::CliConsole;
use anyhow::{Context, bail};
use std::path::Path;
use whatif_core::config::ConfigLoader;
use whatif_core::GatewayConfig;

/// Show the effective configuration with API keys masked
pub fn show(config: &GatewayConfig, path: Option<&Path>) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration");

    match path {
        Some(path) if path.exists() => {
            console.success(&format!("Loaded configuration from: {}", path.display()))
        }
        Some(path) => {
            console.warn(&format!("Configuration file not found: {}", path.display()));
            console.info("Using default configuration");
        }
        None => console.info("Using default configuration"),
    }

    println!();
    println!("{}", masked(config).to_toml_string()?);
    Ok(())
}

/// Validate the configuration file, environment overrides included
pub fn validate(path: Option<&Path>) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Validation");

    let Some(path) = path else {
        bail!("No configuration path; pass --config");
    };
    if !path.exists() {
        bail!("Configuration file not found: {}", path.display());
    }
    console.info(&format!("Validating configuration file: {}", path.display()));

    match ConfigLoader::new().with_file(path).load() {
        Ok(config) => {
            console.success("Configuration is valid");
            console.print_separator();
            console.field("Providers enabled", config.enabled_providers().count());
            console.field(
                "Providers with keys",
                config
                    .enabled_providers()
                    .filter(|p| p.api_key.is_some())
                    .count(),
            );
            console.field(
                "Rate limit",
                format!(
                    "{} tokens, {}/s refill",
                    config.rate_limit.capacity, config.rate_limit.refill_rate
                ),
            );
            console.field(
                "Cache",
                format!("{} entries, {}s TTL", config.cache.capacity, config.cache.ttl_secs),
            );
            console.field("Procedural fallback", config.fallback.procedural_enabled);
            Ok(())
        }
        Err(e) => {
            console.error(&format!("Configuration validation failed: {e}"));
            Err(e.into())
        }
    }
}

/// Write the default configuration
pub async fn init(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Initialization");

    let Some(path) = path else {
        bail!("No configuration directory found; pass --config");
    };
    if path.exists() && !force {
        console.info("Use --force to overwrite");
        bail!("Configuration file already exists: {}", path.display());
    }

    let contents = GatewayConfig::default().to_toml_string()?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    console.success(&format!("Created configuration file: {}", path.display()));
    console.info("Set provider API keys in the environment or the providers section");
    Ok(())
}

/// Copy of `config` safe to print
fn masked(config: &GatewayConfig) -> GatewayConfig {
    let mut config = config.clone();
    for provider in &mut config.providers {
        provider.api_key = provider.api_key.as_deref().map(mask_key);
    }
    config
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("short"), "****");
        assert_eq!(mask_key("sk-or-v1-abcdef123456"), "****3456");
    }

    #[test]
    fn test_masked_config_hides_keys() {
        let mut config = GatewayConfig::default();
        config.providers[0].api_key = Some("sk-ant-secret-value-9999".to_string());

        let shown = masked(&config).to_toml_string().unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("****9999"));
        assert_eq!(config.providers[0].api_key.as_deref(), Some("sk-ant-secret-value-9999"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init(Some(path.as_path()), false).await.unwrap();
        assert!(path.exists());
        assert!(init(Some(path.as_path()), false).await.is_err());
        init(Some(path.as_path()), true).await.unwrap();
        validate(Some(path.as_path())).unwrap();
    }
}
