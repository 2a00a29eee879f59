//! CLI argument definitions using clap
//!
//! - whatif simulate "decision"       # Run a simulation
//! - whatif config show|init|validate # Manage configuration
//! - whatif providers                 # List providers

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use whatif_core::ProviderKind;
use whatif_core::simulation::DEFAULT_BRANCHES;

#[derive(Parser, Debug)]
#[command(name = "whatif")]
#[command(about = "What If - simulate alternative life paths with LLMs")]
#[command(
    long_about = r#"What If - simulate alternative life paths with LLMs

USAGE:
  whatif simulate "move to Lisbon"            # Four realistic branches
  whatif simulate "quit my job" -m random -b 2
  whatif simulate "study law" --json --stats

UTILITY COMMANDS:
  whatif config init                          # Create config file
  whatif config show                          # Show current config
  whatif providers                            # List providers"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "WHATIF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output and debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate alternative outcomes of a decision
    Simulate {
        /// The decision to explore
        decision: String,

        /// Simulation mode: realistic, 50/50 or random
        #[arg(long, short, default_value = "realistic")]
        mode: String,

        /// Number of branches to generate
        #[arg(long, short, default_value_t = DEFAULT_BRANCHES)]
        branches: usize,

        /// Try these providers first (repeatable)
        #[arg(long = "prefer", value_name = "PROVIDER")]
        prefer: Vec<ProviderKind>,

        /// Your current age, used to ground the narratives
        #[arg(long)]
        age: Option<u32>,

        /// A personality trait of yours (repeatable)
        #[arg(long = "trait", value_name = "TRAIT")]
        traits: Vec<String>,

        /// Where you currently live
        #[arg(long)]
        location: Option<String>,

        /// Print the simulation as JSON
        #[arg(long)]
        json: bool,

        /// Print usage, rate limit and cache statistics after the run
        #[arg(long)]
        stats: bool,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List supported providers and the configured fallback chain
    Providers,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration with API keys masked
    Show,

    /// Validate the configuration file
    Validate,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
