//! Failure handling for patch generation.
//!
//! Generation never returns an error to its caller. A failure is handed to a
//! [`FailureReporter`], and the [`FailurePolicy`] decides whether the other
//! patches of the same call survive it.

use crate::errors::{Error, TrafficDirection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// What happens to a call's patches when one direction fails to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Discard every patch of the call
    AbortAll,
    /// Drop only the failed direction's patches
    SkipPatch,
}

/// Failure mode per traffic direction.
///
/// The default treats outbound failures as fatal and inbound failures as
/// best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePolicy {
    pub outbound: FailureMode,
    pub inbound: FailureMode,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self { outbound: FailureMode::AbortAll, inbound: FailureMode::SkipPatch }
    }
}

impl FailurePolicy {
    /// Any failure discards the whole call.
    pub fn strict() -> Self {
        Self { outbound: FailureMode::AbortAll, inbound: FailureMode::AbortAll }
    }

    /// Failures only drop their own direction.
    pub fn lenient() -> Self {
        Self { outbound: FailureMode::SkipPatch, inbound: FailureMode::SkipPatch }
    }

    pub fn mode(&self, direction: TrafficDirection) -> FailureMode {
        match direction {
            TrafficDirection::Outbound => self.outbound,
            TrafficDirection::Inbound => self.inbound,
        }
    }
}

/// Receives generation failures.
pub trait FailureReporter {
    fn report_failure(&self, direction: TrafficDirection, service: &str, error: &Error);
}

impl<R: FailureReporter + ?Sized> FailureReporter for &R {
    fn report_failure(&self, direction: TrafficDirection, service: &str, error: &Error) {
        (**self).report_failure(direction, service, error)
    }
}

impl<R: FailureReporter + ?Sized> FailureReporter for Arc<R> {
    fn report_failure(&self, direction: TrafficDirection, service: &str, error: &Error) {
        (**self).report_failure(direction, service, error)
    }
}

/// Reports failures as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report_failure(&self, direction: TrafficDirection, service: &str, error: &Error) {
        error!(
            direction = %direction,
            service = %service,
            error = %error,
            "Failed to generate {} EnvoyFilter",
            direction
        );
    }
}
