//! Core traits

mod credential;
mod metrics;
mod sink;
#[cfg(feature = "tracing")]
mod tracing;

pub use credential::{CredentialSource, SharedCredential, StaticCredential};
pub use metrics::{ClientMetrics, NoopMetrics};
pub use sink::{NoopSink, SnapshotSink};

#[cfg(feature = "metrics")]
pub use metrics::MetricsCrateAdapter;

#[cfg(feature = "tracing")]
pub use self::tracing::TracingMetrics;
