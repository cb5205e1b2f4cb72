//! Domain layer
//!
//! Plain data types exchanged with the generator: the service descriptor it
//! reads, the patch wrappers it returns, and the EnvoyFilter manifests those
//! wrappers render to. No generation logic lives here.

pub mod envoy_filter;
pub mod patch;
pub mod service;

pub use envoy_filter::EnvoyFilter;
pub use patch::{ApplyTo, ConfigPatch, ListenerMatch, PatchOperation, PatchWrapper};
pub use service::{Port, ServiceDescriptor, WorkloadSelector};
