//! CLI commands

pub mod config;
pub mod providers;
pub mod simulate;
