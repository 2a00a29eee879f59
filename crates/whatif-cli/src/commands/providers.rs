//! Provider listing

use crate::console::CliConsole;
use colored::*;
use whatif_core::{GatewayConfig, ProviderKind};

/// List supported providers and the configured chain
pub fn list(config: &GatewayConfig) -> anyhow::Result<()> {
    let console = CliConsole::new(true);

    console.print_header("Supported Providers");
    for kind in ProviderKind::ALL {
        println!(
            "  {:<12} {:<18} {}",
            kind.name().bold(),
            format!("{:?}", kind.dialect()).dimmed(),
            kind.default_base_url()
        );
        console.field("Key variable", kind.api_key_env());
        console.field("Default model", kind.default_model());
    }

    console.print_header("Fallback Chain");
    if config.providers.is_empty() {
        console.warn("No providers configured");
    }
    for (index, provider) in config.providers.iter().enumerate() {
        let status = match (provider.enabled, provider.api_key.is_some()) {
            (false, _) => "disabled".dimmed(),
            (true, true) => "ready".green(),
            (true, false) => format!("missing {}", provider.key_env()).yellow(),
        };
        println!(
            "  {}. {:<45} {:>4}s  ${:<8} {}",
            index + 1,
            provider.label(),
            provider.timeout_secs,
            provider.price_per_1k(),
            status
        );
    }
    if config.fallback.procedural_enabled {
        println!("  {}", "then: local procedural generation".dimmed());
    }
    Ok(())
}
