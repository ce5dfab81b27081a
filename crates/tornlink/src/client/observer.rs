use std::time::Duration;

use tracing::{error, warn};

use tornlink_core::{ApiError, ClientMetrics};
use tornlink_http::{Endpoint, FetchObserver, RawResponse};
use tornlink_storage::RateTracker;

/// Feeds every dispatched request into the rate window and metrics
pub(super) struct RequestObserver<'a, M: ClientMetrics> {
    pub(super) rate: &'a RateTracker,
    pub(super) metrics: &'a M,
}

impl<M: ClientMetrics> FetchObserver for RequestObserver<'_, M> {
    fn on_dispatch(&self, endpoint: &Endpoint) {
        let count = self.rate.record_request();
        self.metrics.record_request(&endpoint.describe());
        self.metrics.record_rate(count);
    }

    fn on_settled(
        &self,
        endpoint: &Endpoint,
        elapsed: Duration,
        outcome: &tornlink_core::Result<RawResponse>,
    ) {
        let label = endpoint.describe();
        self.metrics.record_latency(&label, elapsed);
        if let Err(err) = outcome {
            self.metrics.record_failure(&label, err.kind());
            log_failure(endpoint, err);
        }
    }
}

/// Failures on the caller's side (bad key, bad parameters) are logged louder
/// than network trouble
fn log_failure(endpoint: &Endpoint, err: &ApiError) {
    if !err.is_caller_side() {
        warn!(
            target: "tornlink",
            endpoint = %endpoint,
            kind = err.kind().as_str(),
            error = %err,
            "request failed"
        );
        return;
    }
    match err {
        ApiError::Upstream { code, message } => error!(
            target: "tornlink",
            endpoint = %endpoint,
            code,
            message = %message,
            "upstream rejected request"
        ),
        _ => error!(
            target: "tornlink",
            endpoint = %endpoint,
            kind = err.kind().as_str(),
            error = %err,
            "request rejected"
        ),
    }
}
