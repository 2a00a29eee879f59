//! Gateway configuration
//!
//! Configuration is resolved in three layers: file (TOML, YAML or JSON),
//! environment overrides, then validation. Invalid configuration is the only
//! error that is fatal at startup.

mod env_loader;
mod file_loader;
mod loader;
mod logging;
mod model;
mod validation;

pub use env_loader::{apply_env_overrides, load_env_overrides};
pub use file_loader::load_from_file;
pub use loader::{ConfigLoader, default_config_path};
pub use logging::{LogFormat, LoggingConfig};
pub use model::{FallbackConfig, GatewayConfig, ProviderConfig};
pub use validation::ConfigValidator;
