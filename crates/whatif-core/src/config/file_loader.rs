//! File-based configuration loading

use super::model::GatewayConfig;
use crate::error::{WhatIfError, WhatIfResult};
use std::fs;
use std::path::Path;

/// Load configuration from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> WhatIfResult<GatewayConfig> {
    if !path.exists() {
        return Ok(GatewayConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        WhatIfError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            WhatIfError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            WhatIfError::config_with_context(
                format!("Failed to parse YAML config: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            WhatIfError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}
