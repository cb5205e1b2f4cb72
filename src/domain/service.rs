//! Service descriptor consumed by the patch generator.
//!
//! Mirrors the parts of an Istio `ServiceEntry` that influence network filter
//! patches. The descriptor is owned by the caller; the generator only reads it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// A service port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct Port {
    /// Transport port number
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub number: u32,

    /// Port name as declared on the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Declared application protocol (e.g. `tcp-dubbo`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl Port {
    pub fn new(number: u32) -> Self {
        Self { number, ..Default::default() }
    }
}

/// Label selector restricting which workloads a patch applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkloadSelector {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl WorkloadSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, replacing any previous value for the key.
    pub fn with_label<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WorkloadSelector {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { labels: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Description of a mesh service for which patches are generated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Hostnames; the first one is the primary host used in patch names
    #[validate(length(min = 1, message = "Service must declare at least one host"))]
    pub hosts: Vec<String>,

    /// Virtual IPs, one outbound listener per address
    #[serde(default)]
    pub addresses: Vec<String>,

    /// Declared ports
    #[serde(default)]
    #[validate(nested)]
    pub ports: Vec<Port>,

    /// Explicit workload selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_selector: Option<WorkloadSelector>,

    /// Service annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ServiceDescriptor {
    /// Create a descriptor from hosts, addresses and port numbers.
    pub fn new<H, A>(hosts: H, addresses: A, ports: &[u32]) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            addresses: addresses.into_iter().map(Into::into).collect(),
            ports: ports.iter().copied().map(Port::new).collect(),
            ..Default::default()
        }
    }

    pub fn with_workload_selector(mut self, selector: WorkloadSelector) -> Self {
        self.workload_selector = Some(selector);
        self
    }

    pub fn with_annotation<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// The host used to name patches.
    pub fn primary_host(&self) -> Option<&str> {
        self.hosts.first().map(String::as_str)
    }

    /// The first declared port.
    pub fn primary_port(&self) -> Option<&Port> {
        self.ports.first()
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}
