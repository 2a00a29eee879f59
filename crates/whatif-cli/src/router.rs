//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::{commands, logging};
use std::path::PathBuf;
use whatif_core::config::{ConfigLoader, default_config_path};
use whatif_core::{GatewayConfig, LoggingConfig, SimulationMode};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().or_else(default_config_path);

    // logging comes up before strict loading so load errors are reported
    let logging_config = preload_logging(config_path.as_ref());
    logging::init(&logging_config, cli.verbose);
    tracing::debug!(path = ?config_path, "Resolved configuration path");

    match cli.command {
        Commands::Simulate {
            decision,
            mode,
            branches,
            prefer,
            age,
            traits,
            location,
            json,
            stats,
        } => {
            let config = load_config(config_path.as_ref())?;
            let options = commands::simulate::SimulateOptions {
                mode: SimulationMode::parse_lenient(&mode),
                branches,
                prefer,
                user: commands::simulate::user_context(age, traits, location),
                json,
                stats,
                verbose: cli.verbose,
            };
            commands::simulate::run(&config, &decision, options).await
        }
        Commands::Config { action } => route_config(action, config_path).await,
        Commands::Providers => {
            let config = load_config(config_path.as_ref())?;
            commands::providers::list(&config)
        }
    }
}

async fn route_config(action: ConfigAction, path: Option<PathBuf>) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(path.as_ref())?;
            commands::config::show(&config, path.as_deref())
        }
        ConfigAction::Validate => commands::config::validate(path.as_deref()),
        ConfigAction::Init { force } => commands::config::init(path.as_deref(), force).await,
    }
}

fn loader(path: Option<&PathBuf>) -> ConfigLoader {
    match path {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new(),
    }
}

/// Fully resolved and validated configuration
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GatewayConfig> {
    Ok(loader(path).load()?)
}

fn preload_logging(path: Option<&PathBuf>) -> LoggingConfig {
    loader(path)
        .without_validation()
        .load()
        .map(|config| config.logging)
        .unwrap_or_default()
}
