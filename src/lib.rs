//! # Aeraki EnvoyFilter
//!
//! Generates Istio `EnvoyFilter` patches that install a protocol-aware
//! network filter (Dubbo, Thrift, Kafka, MetaProtocol or any third-party
//! filter) on a mesh service's listeners.
//!
//! ## Architecture
//!
//! ```text
//! ServiceDescriptor + FilterConfig
//!        ↓
//! NetworkFilterPatchGenerator ─→ Structured Value Encoder (xds::filters)
//!        │                    ─→ Naming / Workload Selector (envoyfilter)
//!        ↓
//! Vec<PatchWrapper> ─→ EnvoyFilter manifests (domain)
//! ```
//!
//! Delivery of the patches to a cluster is out of scope.
//!
//! ## Example Usage
//!
//! ```rust
//! use aeraki_envoyfilter::xds::filters::network::DubboProxy;
//! use aeraki_envoyfilter::xds::filters::ProtocolFilter;
//! use aeraki_envoyfilter::{NetworkFilterPatchGenerator, Port, ServiceDescriptor};
//!
//! let service = ServiceDescriptor::new(["svcA"], ["10.0.0.1", "10.0.0.2"], &[9080]);
//! let proxy = DubboProxy::new("outbound|9080||svcA");
//!
//! let patches = NetworkFilterPatchGenerator::new().replace_default_filter(
//!     &service,
//!     &Port::new(9080),
//!     Some(&proxy),
//!     None,
//!     DubboProxy::FILTER_NAME,
//!     DubboProxy::TYPE_URL,
//! );
//! assert_eq!(patches.len(), 2);
//! assert_eq!(patches[0].name, "aeraki-outbound-svcA-10.0.0.1-9080");
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod envoyfilter;
pub mod errors;
pub mod observability;
pub mod xds;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use domain::{EnvoyFilter, PatchOperation, PatchWrapper, Port, ServiceDescriptor, WorkloadSelector};
pub use envoyfilter::{
    FailureMode, FailurePolicy, FailureReporter, ListenerTargets, NetworkFilterPatchGenerator, TracingReporter,
};
pub use errors::{EncodingError, Error, Result, TrafficDirection};
pub use xds::filters::{encode_filter, FilterConfig, NamedFilterEntry};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
