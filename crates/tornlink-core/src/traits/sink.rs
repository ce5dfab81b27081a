//! Snapshot sink collaborator

use async_trait::async_trait;

use crate::{ApiError, Canonical, ResourceKey};

/// Receives freshly fetched canonical values for persistence or sync
///
/// Implemented by a backend-as-a-service adapter in an application, e.g. to
/// share the faction snapshot with other clients. The client never waits on
/// it for its own result.
#[async_trait]
pub trait SnapshotSink: Send + Sync + 'static {
    async fn publish(&self, key: ResourceKey, value: &Canonical) -> Result<(), ApiError>;
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl SnapshotSink for NoopSink {
    async fn publish(&self, _key: ResourceKey, _value: &Canonical) -> Result<(), ApiError> {
        Ok(())
    }
}
