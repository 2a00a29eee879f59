//! CLI console utilities

use colored::*;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    pub fn print_separator(&self) {
        println!("{}", "-".repeat(50).dimmed());
    }

    /// Print an aligned `label: value` line
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<22} {}", format!("{}:", label).dimmed(), value);
    }
}
