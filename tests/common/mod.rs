//! Common test utilities for all integration tests.
//!
//! Provides service fixtures, filter configurations and a recording reporter.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use aeraki_envoyfilter::xds::filters::network::{DubboProxy, KafkaBroker};
use aeraki_envoyfilter::xds::filters::JsonFilterConfig;
use aeraki_envoyfilter::{Error, FailureReporter, ServiceDescriptor, TrafficDirection, WorkloadSelector};
use serde_json::json;
use std::sync::Mutex;

pub const DUBBO_INTERFACE: &str = "org.apache.dubbo.samples.basic.api.DemoService";

/// `svcA` with two virtual IPs and port 9080, no selector.
pub fn svc_a() -> ServiceDescriptor {
    ServiceDescriptor::new(["svcA"], ["10.0.0.1", "10.0.0.2"], &[9080])
}

/// A Dubbo provider service scoped by an explicit workload selector.
pub fn dubbo_service() -> ServiceDescriptor {
    ServiceDescriptor::new(["dubbo.example.com"], ["240.240.0.1"], &[20880])
        .with_workload_selector(WorkloadSelector::new().with_label("app", "dubbo-provider"))
}

pub fn outbound_dubbo() -> DubboProxy {
    DubboProxy::for_interface(
        "outbound|20880||dubbo.example.com",
        DUBBO_INTERFACE,
        "outbound|20880||dubbo.example.com",
    )
}

pub fn inbound_dubbo() -> DubboProxy {
    DubboProxy::for_interface("inbound|20880||", DUBBO_INTERFACE, "inbound|20880||")
}

/// Dubbo configuration carrying a field the schema does not declare.
pub fn dubbo_with_unknown_field() -> JsonFilterConfig<DubboProxy> {
    JsonFilterConfig::new(json!({
        "stat_prefix": "outbound|20880||dubbo.example.com",
        "max_connections": 10
    }))
}

pub fn kafka() -> KafkaBroker {
    KafkaBroker::new("outbound|9092||kafka")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub direction: TrafficDirection,
    pub service: String,
    pub message: String,
    pub encoding: bool,
}

/// Reporter that keeps every failure for later assertions.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl FailureReporter for RecordingReporter {
    fn report_failure(&self, direction: TrafficDirection, service: &str, error: &Error) {
        self.reports.lock().unwrap().push(Report {
            direction,
            service: service.to_string(),
            message: error.to_string(),
            encoding: error.is_encoding(),
        });
    }
}
