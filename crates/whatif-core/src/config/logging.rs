//! Logging configuration

use crate::error::WhatIfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = WhatIfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(WhatIfError::invalid_field(
                "format",
                format!("Unknown log format: {}", other),
            )),
        }
    }
}

/// Logging configuration
///
/// `RUST_LOG` takes precedence over `level` when the subscriber is installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: LogFormat,
    /// Include the event target (module path) in output
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            with_target: false,
        }
    }
}

impl LoggingConfig {
    pub const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Filter directive used when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        format!("whatif_core={level},whatif={level}", level = self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.with_target);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_filter_directive() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(config.filter_directive(), "whatif_core=debug,whatif=debug");
    }
}
