//! EnvoyFilter patch generation for protocol-aware network filters.

pub mod generator;
pub mod naming;
pub mod policy;
pub mod selector;

pub use generator::{ListenerTargets, NetworkFilterPatchGenerator};
pub use naming::{inbound_patch_name, outbound_listener_name, outbound_patch_name};
pub use policy::{FailureMode, FailurePolicy, FailureReporter, TracingReporter};
pub use selector::{resolve_workload_selector, WORKLOAD_SELECTOR_ANNOTATION};
