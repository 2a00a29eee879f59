//! From trait implementations for WhatIfError conversions

use super::types::WhatIfError;

impl From<std::io::Error> for WhatIfError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for WhatIfError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for WhatIfError {
    fn from(error: toml::de::Error) -> Self {
        Self::config_with_context(error.to_string(), "Deserializing TOML configuration")
    }
}

impl From<toml::ser::Error> for WhatIfError {
    fn from(error: toml::ser::Error) -> Self {
        Self::config_with_context(error.to_string(), "Serializing TOML configuration")
    }
}

impl From<serde_yaml::Error> for WhatIfError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config_with_context(error.to_string(), "Deserializing YAML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: WhatIfError = io.into();
        assert!(matches!(err, WhatIfError::Io { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WhatIfError = parse.into();
        assert!(matches!(err, WhatIfError::Json { .. }));
    }

    #[test]
    fn test_toml_error_is_config_error() {
        let parse = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: WhatIfError = parse.into();
        assert!(matches!(err, WhatIfError::Config { .. }));
    }
}
