//! Metrics adapter that logs through `tracing`

use crate::{ClientMetrics, FailureKind, ResourceKey};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl ClientMetrics for TracingMetrics {
    fn record_hit(&self, key: ResourceKey) {
        debug!(
            target: "tornlink",
            event = "hit",
            resource = %key,
            service = ?self.service_name,
            "Cache Hit"
        );
    }

    fn record_miss(&self, key: ResourceKey) {
        debug!(
            target: "tornlink",
            event = "miss",
            resource = %key,
            service = ?self.service_name,
            "Cache Miss"
        );
    }

    fn record_request(&self, endpoint: &str) {
        debug!(
            target: "tornlink",
            event = "request",
            endpoint = %endpoint,
            service = ?self.service_name,
            "Upstream Request"
        );
    }

    fn record_failure(&self, endpoint: &str, kind: FailureKind) {
        warn!(
            target: "tornlink",
            event = "failure",
            endpoint = %endpoint,
            kind = kind.as_str(),
            service = ?self.service_name,
            "Upstream Failure"
        );
    }

    fn record_latency(&self, endpoint: &str, duration: Duration) {
        trace!(
            target: "tornlink",
            event = "latency",
            endpoint = %endpoint,
            duration_ms = duration.as_millis(),
            service = ?self.service_name,
            "Upstream Latency"
        );
    }

    fn record_rate(&self, count: u32) {
        trace!(
            target: "tornlink",
            event = "rate",
            per_minute = count,
            service = ?self.service_name,
            "Request Rate"
        );
    }
}
