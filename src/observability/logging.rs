//! # Structured Logging
//!
//! Span macros and subscriber setup on top of the `tracing` ecosystem.
//!
//! Generation failures are emitted as `error` events by the default
//! reporter, so the default level keeps them visible while hiding the
//! per-call `debug` noise.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Create a tracing span for a patch generation call
///
/// ```rust,ignore
/// let span = patch_span!(PatchOperation::Replace, "svcA", port = 9080);
/// ```
#[macro_export]
macro_rules! patch_span {
    ($operation:expr, $service:expr) => {
        tracing::debug_span!(
            "patch_generation",
            operation = %$operation,
            service = %$service
        )
    };
    ($operation:expr, $service:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "patch_generation",
            operation = %$operation,
            service = %$service,
            $($field)*
        )
    };
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. If a subscriber is
/// already installed the call is a no-op.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&config.log_level),
    }
    .map_err(|e| Error::config_with_source("Invalid log filter", Box::new(e)))?;

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    // A subscriber installed earlier (e.g. by tests) keeps precedence.
    let _ = if config.json_logging {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    Ok(())
}
