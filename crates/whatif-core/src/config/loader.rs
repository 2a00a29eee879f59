//! Layered configuration loading

use super::env_loader::apply_env_overrides;
use super::file_loader::load_from_file;
use super::model::GatewayConfig;
use super::validation::ConfigValidator;
use crate::error::WhatIfResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file: `<config dir>/whatif/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("whatif").join("config.toml"))
}

/// Builder-style loader combining file, environment and validation
pub struct ConfigLoader {
    path: Option<PathBuf>,
    use_env: bool,
    validate: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            path: None,
            use_env: true,
            validate: true,
        }
    }

    /// Load from this file instead of the default location
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Load using the process environment
    pub fn load(self) -> WhatIfResult<GatewayConfig> {
        self.load_with(|name| std::env::var(name).ok())
    }

    /// Load using a custom environment lookup
    pub fn load_with<F>(self, lookup: F) -> WhatIfResult<GatewayConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = self.path.or_else(default_config_path);
        let mut config = match &path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                load_from_file(path)?
            }
            None => GatewayConfig::default(),
        };

        if self.use_env {
            apply_env_overrides(&mut config, lookup)?;
        }
        if self.validate {
            ConfigValidator::validate(&config)?;
        }
        Ok(config)
    }
}
