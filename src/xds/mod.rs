//! Envoy-facing pieces of patch generation
//!
//! Well-known listener and filter names the patches anchor on, and the
//! [`filters`] encoder that turns protocol configurations into typed-config
//! envelopes.

pub mod filters;

/// Default transport proxy filter every patch is positioned relative to.
pub const TCP_PROXY_FILTER: &str = "envoy.filters.network.tcp_proxy";

/// Shared listener that receives all inbound traffic of a sidecar.
pub const VIRTUAL_INBOUND_LISTENER: &str = "virtualInbound";
