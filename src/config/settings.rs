//! # Configuration Settings
//!
//! Defines the configuration structure for the EnvoyFilter patch generator.

use crate::envoyfilter::{FailureMode, FailurePolicy, ListenerTargets};
use crate::errors::{Error, Result};
use crate::xds::{TCP_PROXY_FILTER, VIRTUAL_INBOUND_LISTENER};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Patch generation configuration
    #[validate(nested)]
    pub generator: GeneratorSettings,

    /// Logging configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        self.validate_custom()?;

        Ok(())
    }

    fn validate_custom(&self) -> Result<()> {
        if self.generator.anchor_filter == self.generator.inbound_listener {
            return Err(Error::validation_field(
                "Anchor filter and inbound listener must differ",
                "generator.anchor_filter",
            ));
        }

        if !LOG_LEVELS.contains(&self.observability.log_level.to_ascii_lowercase().as_str()) {
            return Err(Error::validation_field(
                format!(
                    "Unknown log level '{}', expected one of {}",
                    self.observability.log_level,
                    LOG_LEVELS.join(", ")
                ),
                "observability.log_level",
            ));
        }

        Ok(())
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Patch generation settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeneratorSettings {
    /// What an outbound encoding failure does to the rest of the call
    pub outbound_failure: FailureMode,

    /// What an inbound encoding failure does to the rest of the call
    pub inbound_failure: FailureMode,

    /// Shared inbound listener name
    #[validate(length(min = 1, message = "Inbound listener cannot be empty"))]
    pub inbound_listener: String,

    /// Filter that patches are anchored on
    #[validate(length(min = 1, message = "Anchor filter cannot be empty"))]
    pub anchor_filter: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        let policy = FailurePolicy::default();
        Self {
            outbound_failure: policy.outbound,
            inbound_failure: policy.inbound,
            inbound_listener: VIRTUAL_INBOUND_LISTENER.to_string(),
            anchor_filter: TCP_PROXY_FILTER.to_string(),
        }
    }
}

impl GeneratorSettings {
    pub fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy { outbound: self.outbound_failure, inbound: self.inbound_failure }
    }

    pub fn listener_targets(&self) -> ListenerTargets {
        ListenerTargets {
            inbound_listener: self.inbound_listener.clone(),
            anchor_filter: self.anchor_filter.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "warn".to_string(), json_logging: false }
    }
}
