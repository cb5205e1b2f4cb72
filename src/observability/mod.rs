//! # Observability
//!
//! Structured logging for the patch generator and its CLI.

pub mod logging;

pub use logging::init_logging;
