//! Istio `EnvoyFilter` resource rendering.
//!
//! Converts generated [`PatchWrapper`]s into `networking.istio.io/v1alpha3`
//! manifests that can be written as YAML or JSON.

use crate::domain::patch::{ApplyTo, PatchOperation, PatchWrapper};
use crate::domain::service::WorkloadSelector;
use crate::xds::filters::NamedFilterEntry;
use serde::{Deserialize, Serialize};

/// Object metadata for a rendered resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Istio EnvoyFilter resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvoyFilter {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: EnvoyFilterSpec,
}

impl EnvoyFilter {
    pub const API_VERSION: &'static str = "networking.istio.io/v1alpha3";
    pub const KIND: &'static str = "EnvoyFilter";
}

/// EnvoyFilter spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvoyFilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_selector: Option<WorkloadSelector>,
    pub config_patches: Vec<EnvoyConfigObjectPatch>,
}

/// One entry of `spec.configPatches`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvoyConfigObjectPatch {
    pub apply_to: ApplyTo,
    #[serde(rename = "match")]
    pub object_match: EnvoyConfigObjectMatch,
    pub patch: Patch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvoyConfigObjectMatch {
    pub listener: ListenerObjectMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerObjectMatch {
    pub name: String,
    pub filter_chain: FilterChainMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChainMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u32>,
    pub filter: FilterMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMatch {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub operation: PatchOperation,
    pub value: NamedFilterEntry,
}

impl PatchWrapper {
    /// Render this wrapper as an Istio EnvoyFilter resource.
    pub fn to_envoy_filter(&self, namespace: Option<&str>) -> EnvoyFilter {
        let config_patches = self
            .patches
            .iter()
            .map(|patch| EnvoyConfigObjectPatch {
                apply_to: patch.apply_to,
                object_match: EnvoyConfigObjectMatch {
                    listener: ListenerObjectMatch {
                        name: patch.listener_match.name.clone(),
                        filter_chain: FilterChainMatch {
                            destination_port: patch.listener_match.destination_port,
                            filter: FilterMatch { name: patch.listener_match.filter.clone() },
                        },
                    },
                },
                patch: Patch { operation: patch.operation, value: patch.value.clone() },
            })
            .collect();

        EnvoyFilter {
            api_version: EnvoyFilter::API_VERSION.to_string(),
            kind: EnvoyFilter::KIND.to_string(),
            metadata: ObjectMeta {
                name: self.name.clone(),
                namespace: namespace.map(str::to_string),
            },
            spec: EnvoyFilterSpec {
                workload_selector: self.workload_selector.clone(),
                config_patches,
            },
        }
    }
}
