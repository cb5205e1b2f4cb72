//! # Network Filter Patch Generator
//!
//! Builds the EnvoyFilter patches that put a protocol-aware network filter in
//! front of (or in place of) the TCP proxy of a service's listeners.
//!
//! For a service and port the generator emits:
//! - one outbound patch per service address, on listener `{address}_{port}`
//! - at most one inbound patch, on the shared inbound listener, filtered by
//!   destination port and scoped by the resolved workload selector
//!
//! Each filter configuration is encoded once and shared by every patch of
//! its direction.

use crate::config::GeneratorSettings;
use crate::domain::{ConfigPatch, ListenerMatch, PatchOperation, PatchWrapper, Port, ServiceDescriptor};
use crate::envoyfilter::naming::{inbound_patch_name, outbound_listener_name, outbound_patch_name};
use crate::envoyfilter::policy::{FailureMode, FailurePolicy, FailureReporter, TracingReporter};
use crate::envoyfilter::selector::resolve_workload_selector;
use crate::errors::types::validation_summary;
use crate::errors::{Error, TrafficDirection};
use crate::xds::filters::{encode_filter, FilterConfig, NamedFilterEntry};
use crate::xds::{TCP_PROXY_FILTER, VIRTUAL_INBOUND_LISTENER};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Listener and anchor filter names patches are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerTargets {
    /// Shared listener receiving inbound traffic
    pub inbound_listener: String,
    /// Filter the patch is positioned relative to
    pub anchor_filter: String,
}

impl Default for ListenerTargets {
    fn default() -> Self {
        Self {
            inbound_listener: VIRTUAL_INBOUND_LISTENER.to_string(),
            anchor_filter: TCP_PROXY_FILTER.to_string(),
        }
    }
}

/// Inputs shared by both public entry points.
struct PatchRequest<'a> {
    service: &'a ServiceDescriptor,
    port: &'a Port,
    outbound: Option<&'a dyn FilterConfig>,
    inbound: Option<&'a dyn FilterConfig>,
    filter_name: &'a str,
    filter_type: &'a str,
    operation: PatchOperation,
}

impl PatchRequest<'_> {
    /// Direction blamed for a failure that affects the whole request.
    fn leading_direction(&self) -> TrafficDirection {
        if self.outbound.is_some() || self.inbound.is_none() {
            TrafficDirection::Outbound
        } else {
            TrafficDirection::Inbound
        }
    }
}

/// Generates network filter patches for services.
///
/// The generator holds no per-call state. Calls with identical inputs return
/// identical patches, and a generator can be shared between threads whenever
/// its reporter can.
#[derive(Debug, Clone)]
pub struct NetworkFilterPatchGenerator<R = TracingReporter> {
    reporter: R,
    policy: FailurePolicy,
    targets: ListenerTargets,
}

impl NetworkFilterPatchGenerator<TracingReporter> {
    /// Generator with the default policy, Istio listener names and `tracing` reporting.
    pub fn new() -> Self {
        Self { reporter: TracingReporter, policy: FailurePolicy::default(), targets: ListenerTargets::default() }
    }

    /// Generator configured from application settings.
    pub fn from_settings(settings: &GeneratorSettings) -> Self {
        Self::new().with_policy(settings.failure_policy()).with_listener_targets(settings.listener_targets())
    }
}

impl Default for NetworkFilterPatchGenerator<TracingReporter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FailureReporter> NetworkFilterPatchGenerator<R> {
    /// Replace the failure reporter.
    pub fn with_reporter<T: FailureReporter>(self, reporter: T) -> NetworkFilterPatchGenerator<T> {
        NetworkFilterPatchGenerator { reporter, policy: self.policy, targets: self.targets }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_listener_targets(mut self, targets: ListenerTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn listener_targets(&self) -> &ListenerTargets {
        &self.targets
    }

    /// Insert the filter before the TCP proxy on the service's first port.
    ///
    /// # Arguments
    ///
    /// * `service` - Service to patch; must declare at least one host and one port
    /// * `outbound` - Configuration for outbound listeners, if any
    /// * `inbound` - Configuration for the inbound listener, if any
    /// * `filter_name` - Envoy network filter name
    /// * `filter_type` - Type URL of the filter configuration
    pub fn insert_filter_before_default(
        &self,
        service: &ServiceDescriptor,
        outbound: Option<&dyn FilterConfig>,
        inbound: Option<&dyn FilterConfig>,
        filter_name: &str,
        filter_type: &str,
    ) -> Vec<PatchWrapper> {
        let Some(port) = service.primary_port() else {
            let request = PatchRequest {
                service,
                port: &Port::default(),
                outbound,
                inbound,
                filter_name,
                filter_type,
                operation: PatchOperation::InsertBefore,
            };
            if outbound.is_some() || inbound.is_some() {
                self.reject(&request, "service declares no ports");
            }
            return Vec::new();
        };

        self.generate(PatchRequest {
            service,
            port,
            outbound,
            inbound,
            filter_name,
            filter_type,
            operation: PatchOperation::InsertBefore,
        })
    }

    /// Replace the TCP proxy with the filter on an explicit port.
    pub fn replace_default_filter(
        &self,
        service: &ServiceDescriptor,
        port: &Port,
        outbound: Option<&dyn FilterConfig>,
        inbound: Option<&dyn FilterConfig>,
        filter_name: &str,
        filter_type: &str,
    ) -> Vec<PatchWrapper> {
        self.generate(PatchRequest {
            service,
            port,
            outbound,
            inbound,
            filter_name,
            filter_type,
            operation: PatchOperation::Replace,
        })
    }

    fn generate(&self, request: PatchRequest<'_>) -> Vec<PatchWrapper> {
        if request.outbound.is_none() && request.inbound.is_none() {
            return Vec::new();
        }

        if let Err(errors) = request.service.validate().and_then(|()| request.port.validate()) {
            self.reject(&request, validation_summary(&errors));
            return Vec::new();
        }
        let Some(host) = request.service.primary_host() else {
            return Vec::new();
        };

        let span = crate::patch_span!(request.operation, host, port = request.port.number);
        let _guard = span.enter();

        let mut patches = Vec::new();

        if let Some(outbound) = request.outbound {
            match self.encode(&request, outbound, TrafficDirection::Outbound, host) {
                Some(entry) => patches.extend(self.outbound_patches(&request, host, &entry)),
                None if self.aborts(TrafficDirection::Outbound) => return Vec::new(),
                None => {}
            }
        }

        if let Some(inbound) = request.inbound {
            let selector = resolve_workload_selector(request.service);
            if selector.is_empty() {
                // An unscoped inbound patch would hit every service on this port.
                debug!("No workload selector resolved, skipping inbound patch");
            } else {
                match self.encode(&request, inbound, TrafficDirection::Inbound, host) {
                    Some(entry) => {
                        let listener = ListenerMatch::new(&self.targets.inbound_listener, &self.targets.anchor_filter)
                            .with_destination_port(request.port.number);
                        let patch = ConfigPatch::network_filter(listener, request.operation, entry);
                        patches.push(
                            PatchWrapper::new(inbound_patch_name(host, request.port.number), patch)
                                .with_workload_selector(selector),
                        );
                    }
                    None if self.aborts(TrafficDirection::Inbound) => return Vec::new(),
                    None => {}
                }
            }
        }

        debug!(patch_count = patches.len(), "Generated network filter patches");
        patches
    }

    fn aborts(&self, direction: TrafficDirection) -> bool {
        self.policy.mode(direction) == FailureMode::AbortAll
    }

    fn outbound_patches(
        &self,
        request: &PatchRequest<'_>,
        host: &str,
        entry: &NamedFilterEntry,
    ) -> Vec<PatchWrapper> {
        let port = request.port.number;
        request
            .service
            .addresses
            .iter()
            .map(|address| {
                let listener =
                    ListenerMatch::new(outbound_listener_name(address, port), &self.targets.anchor_filter);
                let patch = ConfigPatch::network_filter(listener, request.operation, entry.clone());
                PatchWrapper::new(outbound_patch_name(host, address, port), patch)
            })
            .collect()
    }

    fn encode(
        &self,
        request: &PatchRequest<'_>,
        config: &dyn FilterConfig,
        direction: TrafficDirection,
        host: &str,
    ) -> Option<NamedFilterEntry> {
        encode_filter(config, request.filter_name, request.filter_type)
            .map_err(|e| self.reporter.report_failure(direction, host, &Error::from(e)))
            .ok()
    }

    fn reject<M: Into<String>>(&self, request: &PatchRequest<'_>, message: M) {
        let service = request.service.primary_host().unwrap_or("<unnamed>");
        let error = Error::invalid_service(service, message);
        self.reporter.report_failure(request.leading_direction(), service, &error);
    }
}
