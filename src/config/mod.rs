//! # Configuration Management
//!
//! Settings are layered: built-in defaults, then an optional config file
//! (YAML, JSON or TOML by extension), then `AERAKI__`-prefixed environment
//! variables, e.g. `AERAKI__GENERATOR__INBOUND_FAILURE=abort_all`.

pub mod settings;

pub use settings::{AppConfig, GeneratorSettings, ObservabilityConfig};

use crate::errors::Result;
use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "AERAKI";

impl AppConfig {
    /// Load and validate configuration.
    ///
    /// A missing file at `path` is not an error; defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envoyfilter::FailureMode;
    use std::io::Write;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.generator.anchor_filter, "envoy.filters.network.tcp_proxy");
        assert_eq!(config.generator.outbound_failure, FailureMode::AbortAll);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "generator:\n  inbound_failure: abort_all\n  inbound_listener: inbound_0.0.0.0_15006\nobservability:\n  json_logging: true"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.generator.inbound_failure, FailureMode::AbortAll);
        assert_eq!(config.generator.inbound_listener, "inbound_0.0.0.0_15006");
        assert_eq!(config.generator.anchor_filter, "envoy.filters.network.tcp_proxy");
        assert!(config.observability.json_logging);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config.observability.log_level, "warn");
    }

    #[test]
    fn test_invalid_file_values_fail_validation() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "generator:\n  inbound_listener: \"\"").unwrap();

        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
