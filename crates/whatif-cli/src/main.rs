//! What If CLI application
//!
//! Simulate alternative life paths for a decision through a rate-limited,
//! cached LLM gateway.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/whatif-cli
//! ```
//!
//! # Commands
//!
//! - `whatif simulate "<decision>"` runs a simulation and prints each branch
//! - `whatif config show|init|validate` manages the configuration file
//! - `whatif providers` lists supported providers and the configured chain

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;

pub use args::{Cli, Commands, ConfigAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    router::route(cli).await
}
