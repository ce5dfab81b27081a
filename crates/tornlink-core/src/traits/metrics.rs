//! Metrics trait for client observability

use std::time::Duration;

use crate::{FailureKind, ResourceKey};

/// Trait for client metrics/observability
///
/// Implement this to integrate with your metrics system (Prometheus, StatsD, etc.)
pub trait ClientMetrics: Send + Sync + 'static {
    /// Record a cache hit for a requested resource
    fn record_hit(&self, key: ResourceKey);

    /// Record a cache miss for a requested resource
    fn record_miss(&self, key: ResourceKey);

    /// Record an outbound request to an endpoint
    fn record_request(&self, endpoint: &str);

    /// Record a failed request or normalization
    fn record_failure(&self, endpoint: &str, kind: FailureKind);

    /// Record request latency
    fn record_latency(&self, endpoint: &str, duration: Duration);

    /// Record the requests-per-minute window count
    fn record_rate(&self, count: u32);
}

/// No-op metrics implementation (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl ClientMetrics for NoopMetrics {
    #[inline]
    fn record_hit(&self, _key: ResourceKey) {}

    #[inline]
    fn record_miss(&self, _key: ResourceKey) {}

    #[inline]
    fn record_request(&self, _endpoint: &str) {}

    #[inline]
    fn record_failure(&self, _endpoint: &str, _kind: FailureKind) {}

    #[inline]
    fn record_latency(&self, _endpoint: &str, _duration: Duration) {}

    #[inline]
    fn record_rate(&self, _count: u32) {}
}

/// Metrics adapter using the `metrics` crate
///
/// # Example
/// ```ignore
/// use tornlink_core::MetricsCrateAdapter;
///
/// let metrics = MetricsCrateAdapter::new("tornlink");
/// // Emits: tornlink_cache_hits_total, tornlink_requests_total, etc.
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl ClientMetrics for MetricsCrateAdapter {
    fn record_hit(&self, key: ResourceKey) {
        metrics::counter!(self.metric_name("cache_hits_total"), "resource" => key.as_str())
            .increment(1);
    }

    fn record_miss(&self, key: ResourceKey) {
        metrics::counter!(self.metric_name("cache_misses_total"), "resource" => key.as_str())
            .increment(1);
    }

    fn record_request(&self, endpoint: &str) {
        metrics::counter!(self.metric_name("requests_total"), "endpoint" => endpoint.to_string())
            .increment(1);
    }

    fn record_failure(&self, endpoint: &str, kind: FailureKind) {
        metrics::counter!(
            self.metric_name("failures_total"),
            "endpoint" => endpoint.to_string(),
            "kind" => kind.as_str()
        )
        .increment(1);
    }

    fn record_latency(&self, endpoint: &str, duration: Duration) {
        metrics::histogram!(
            self.metric_name("request_duration_seconds"),
            "endpoint" => endpoint.to_string()
        )
        .record(duration.as_secs_f64());
    }

    fn record_rate(&self, count: u32) {
        metrics::gauge!(self.metric_name("requests_per_minute")).set(f64::from(count));
    }
}
