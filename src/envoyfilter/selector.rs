//! Workload selector resolution for inbound patches.

use crate::domain::{ServiceDescriptor, WorkloadSelector};

/// Annotation consulted when a service declares no workload selector.
pub const WORKLOAD_SELECTOR_ANNOTATION: &str = "workloadSelector";

/// Label the annotation value is assigned to.
pub const APP_LABEL: &str = "app";

/// Resolve the selector that scopes a service's inbound patch.
///
/// The service's own selector wins when it has labels. Otherwise the
/// `workloadSelector` annotation is used as the value of the `app` label,
/// after removing every ASCII space (U+0020). Tabs and newlines are kept.
///
/// The annotation path is a compatibility shim over free-form user input:
/// the value is not parsed as `key: value`, so `"app: foo"` yields the label
/// `app=app:foo`.
///
/// An empty result means the inbound patch must not be emitted.
pub fn resolve_workload_selector(service: &ServiceDescriptor) -> WorkloadSelector {
    if let Some(selector) = service.workload_selector.as_ref().filter(|s| !s.is_empty()) {
        return selector.clone();
    }

    let value: String = service
        .annotation(WORKLOAD_SELECTOR_ANNOTATION)
        .map(|raw| raw.chars().filter(|c| *c != ' ').collect())
        .unwrap_or_default();

    if value.is_empty() {
        WorkloadSelector::new()
    } else {
        WorkloadSelector::new().with_label(APP_LABEL, value)
    }
}
