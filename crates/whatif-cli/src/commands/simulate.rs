//! Simulation command

use crate::console::CliConsole;
use anyhow::Context;
use colored::*;
use std::sync::Arc;
use whatif_core::{
    GatewayBuilder, GatewayConfig, LifeBranch, ModelPreferences, PayloadSource, ProviderGateway,
    ProviderKind, Simulation, SimulationEngine, SimulationMode, UserContext,
};

/// Options for a simulation run
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub mode: SimulationMode,
    pub branches: usize,
    pub prefer: Vec<ProviderKind>,
    pub user: Option<UserContext>,
    pub json: bool,
    pub stats: bool,
    pub verbose: bool,
}

/// Collect the personal flags; `None` when none were given
pub fn user_context(age: Option<u32>, traits: Vec<String>, location: Option<String>) -> Option<UserContext> {
    if age.is_none() && traits.is_empty() && location.is_none() {
        return None;
    }
    Some(UserContext { age, traits, location })
}

/// Run a simulation and print the branches
pub async fn run(config: &GatewayConfig, decision: &str, options: SimulateOptions) -> anyhow::Result<()> {
    let console = CliConsole::new(options.verbose);

    let builder = GatewayBuilder::from_config(config).context("Failed to configure providers")?;
    if builder.link_count() == 0 && !options.json {
        console.warn("No provider API keys found; branches will be generated locally");
    }
    let gateway = Arc::new(builder.build()?);

    let mut engine = SimulationEngine::new(Arc::clone(&gateway));
    if !options.prefer.is_empty() {
        engine = engine.with_preferences(ModelPreferences::providers(options.prefer.iter().copied()));
    }
    if let Some(user) = options.user {
        engine = engine.with_user_context(user);
    }

    let simulation = engine.simulate(decision, options.mode, options.branches).await?;

    if options.json {
        let mut output = serde_json::json!({ "simulation": simulation });
        if options.stats {
            output["stats"] = serde_json::json!({
                "usage": gateway.summary(None),
                "rate_limit": gateway.rate_limit_status(),
                "cache": gateway.cache_statistics(),
            });
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_simulation(&console, &simulation);
    if options.stats {
        print_stats(&console, &gateway);
    }
    Ok(())
}

fn print_simulation(console: &CliConsole, simulation: &Simulation) {
    console.print_header(&format!("What if you {}?", simulation.decision));
    console.field("Mode", simulation.mode);
    console.field("Category", simulation.category);
    console.info(&format!("Simulation {}", simulation.id));

    for branch in &simulation.branches {
        print_branch(console, branch);
    }
}

fn print_branch(console: &CliConsole, branch: &LifeBranch) {
    println!();
    console.print_separator();
    println!(
        "{} {}",
        format!("Path {}:", branch.branch_id + 1).bold(),
        branch.title.bold().cyan()
    );
    println!("  {}", fate_badge(branch.fate_score));
    println!();
    println!("  {}", branch.story);
    println!();
    for event in &branch.timeline {
        println!("  {} {}", format!("{:>8}", event.year).yellow(), event.event);
    }
    println!();
    console.field("Key events", branch.key_events.join(", "));
    console.field("Probability", format!("{:.0}%", branch.probability_score * 100.0));
    let source = match (&branch.source, &branch.provider) {
        (PayloadSource::Llm, Some(provider)) => format!("llm ({})", provider),
        (source, _) => source.to_string(),
    };
    console.field("Source", source.dimmed());
}

fn fate_badge(score: u8) -> ColoredString {
    let label = format!("FATE {}/100", score);
    match score {
        71.. => format!("LEGENDARY {}", label).yellow().bold(),
        41..=70 => format!("EPIC {}", label).magenta().bold(),
        _ => format!("CHALLENGING {}", label).red().bold(),
    }
}

fn print_stats(console: &CliConsole, gateway: &ProviderGateway) {
    let summary = gateway.summary(None);
    console.print_header("Usage");
    console.field("Provider calls", summary.total_calls);
    console.field(
        "Success rate",
        format!("{:.1}%", summary.success_rate() * 100.0),
    );
    console.field("Estimated cost", format!("${:.6}", summary.total_cost));
    console.field("Tokens", summary.total_tokens);
    console.field("Cache hits", summary.cache_hits);
    console.field("Procedural fallbacks", summary.procedural_fallbacks);
    console.field("Rate limited", summary.rate_limited);
    for (provider, stats) in &summary.providers {
        console.field(
            provider,
            format!(
                "{} call(s), {:.0}% ok, {:.0} ms avg, ${:.6}",
                stats.count,
                stats.success_rate * 100.0,
                stats.avg_latency_ms,
                stats.total_cost
            ),
        );
    }

    let bucket = gateway.rate_limit_status();
    console.print_header("Rate limit");
    console.field(
        "Tokens",
        format!("{:.1}/{} ({:.0}%)", bucket.available_tokens, bucket.capacity, bucket.percentage),
    );
    console.field("Refill", format!("{} per second", bucket.refill_rate));

    let cache = gateway.cache_statistics();
    console.print_header("Cache");
    console.field("Entries", format!("{}/{}", cache.size, cache.capacity));
    console.field("Hit rate", format!("{:.1}%", cache.hit_rate() * 100.0));
    console.field("Evictions", cache.evictions);
    console.field("Expirations", cache.expirations);
}
