//! Patch model handed to the distribution layer.

use crate::domain::service::WorkloadSelector;
use crate::xds::filters::NamedFilterEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a patch modifies the target filter chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchOperation {
    /// Insert the filter before the anchor filter
    InsertBefore,
    /// Replace the anchor filter
    Replace,
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOperation::InsertBefore => write!(f, "INSERT_BEFORE"),
            PatchOperation::Replace => write!(f, "REPLACE"),
        }
    }
}

/// The kind of object a patch is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplyTo {
    #[default]
    NetworkFilter,
}

/// Selects a listener and the filter a patch is positioned relative to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerMatch {
    /// Listener name
    pub name: String,

    /// Destination port of the filter chain, for shared listeners
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u32>,

    /// Name of the anchor filter in the filter chain
    pub filter: String,
}

impl ListenerMatch {
    pub fn new<N: Into<String>, F: Into<String>>(name: N, filter: F) -> Self {
        Self { name: name.into(), destination_port: None, filter: filter.into() }
    }

    pub fn with_destination_port(mut self, port: u32) -> Self {
        self.destination_port = Some(port);
        self
    }
}

/// A single filter-chain modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    pub apply_to: ApplyTo,
    #[serde(rename = "match")]
    pub listener_match: ListenerMatch,
    pub operation: PatchOperation,
    pub value: NamedFilterEntry,
}

impl ConfigPatch {
    pub fn network_filter(
        listener_match: ListenerMatch,
        operation: PatchOperation,
        value: NamedFilterEntry,
    ) -> Self {
        Self { apply_to: ApplyTo::NetworkFilter, listener_match, operation, value }
    }
}

/// A named set of patches, optionally scoped to a workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchWrapper {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_selector: Option<WorkloadSelector>,
    pub patches: Vec<ConfigPatch>,
}

impl PatchWrapper {
    pub fn new<S: Into<String>>(name: S, patch: ConfigPatch) -> Self {
        Self { name: name.into(), workload_selector: None, patches: vec![patch] }
    }

    pub fn with_workload_selector(mut self, selector: WorkloadSelector) -> Self {
        self.workload_selector = Some(selector);
        self
    }
}
