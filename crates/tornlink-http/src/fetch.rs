//! Bounded concurrent fetching

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde_json::Value;
use tracing::trace;
use url::Url;

use tornlink_core::{ApiError, Result};

use crate::endpoint::Endpoint;
use crate::envelope::check_envelope;
use crate::inflight::InflightRequests;
use crate::transport::Transport;

/// Decoded, envelope-checked response body
pub type RawResponse = Arc<Value>;

/// Hooks around each request that actually goes out
///
/// Requests answered by another caller's in-flight request are not reported.
pub trait FetchObserver: Sync {
    fn on_dispatch(&self, _endpoint: &Endpoint) {}

    fn on_settled(&self, _endpoint: &Endpoint, _elapsed: Duration, _outcome: &Result<RawResponse>) {}
}

impl FetchObserver for () {}

/// Runs endpoints against a [`Transport`], each under its own timeout
pub struct Fetcher<T: Transport> {
    transport: Arc<T>,
    base_url: Url,
    comment: Option<String>,
    inflight: Option<InflightRequests>,
}

impl<T: Transport> Clone for Fetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            base_url: self.base_url.clone(),
            comment: self.comment.clone(),
            inflight: self.inflight.clone(),
        }
    }
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher with in-flight sharing enabled
    pub fn new(transport: Arc<T>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            comment: None,
            inflight: Some(InflightRequests::new()),
        }
    }

    /// Tag every request with `&comment=`
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Enable or disable sharing of identical concurrent requests
    pub fn share_inflight(mut self, enabled: bool) -> Self {
        self.inflight = enabled.then(InflightRequests::new);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch one endpoint: bounded by its timeout, envelope checked
    pub async fn fetch_one(&self, credential: &str, endpoint: &Endpoint) -> Result<RawResponse> {
        let url = endpoint.url(&self.base_url, credential, self.comment.as_deref())?;
        trace!(target: "tornlink", endpoint = %endpoint, "dispatching request");
        let request = self.transport.get_json(&url);
        let value = tokio::time::timeout(endpoint.timeout, request)
            .await
            .map_err(|_| ApiError::Timeout(endpoint.timeout))??;
        check_envelope(value).map(Arc::new)
    }

    /// Fetch all `endpoints` concurrently
    ///
    /// Results come back in the same order as `endpoints`. One endpoint
    /// failing or timing out has no effect on the others.
    pub async fn fetch_all<O>(
        &self,
        credential: &str,
        endpoints: &[Endpoint],
        observer: &O,
    ) -> Vec<Result<RawResponse>>
    where
        O: FetchObserver + ?Sized,
    {
        join_all(
            endpoints
                .iter()
                .map(|endpoint| self.fetch_observed(credential, endpoint, observer)),
        )
        .await
    }

    async fn fetch_observed<O>(
        &self,
        credential: &str,
        endpoint: &Endpoint,
        observer: &O,
    ) -> Result<RawResponse>
    where
        O: FetchObserver + ?Sized,
    {
        let dispatch = || async {
            observer.on_dispatch(endpoint);
            let start = Instant::now();
            let outcome = self.fetch_one(credential, endpoint).await;
            observer.on_settled(endpoint, start.elapsed(), &outcome);
            outcome
        };

        match &self.inflight {
            Some(inflight) => {
                let identity = request_identity(credential, endpoint);
                inflight.run(&identity, dispatch).await
            }
            None => dispatch().await,
        }
    }
}

/// Identity of a request for in-flight sharing, without the credential itself
fn request_identity(credential: &str, endpoint: &Endpoint) -> String {
    let mut hasher = DefaultHasher::new();
    credential.hash(&mut hasher);
    format!("{}#{:016x}", endpoint.describe(), hasher.finish())
}
