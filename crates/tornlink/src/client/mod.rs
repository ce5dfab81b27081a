//! Fetch orchestration
//!
//! [`ApiClient`] answers a set of resources from the TTL store where it can,
//! plans the fewest requests for the rest, runs them concurrently and stores
//! whatever came back. Failures never escape: a resource that could not be
//! produced is absent from the returned [`Snapshot`].

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use tornlink_core::{
    Canonical, CityBankDetails, ClientMetrics, Clock, CredentialSource, FailureKind, NoopMetrics,
    NoopSink, Resource, ResourceKey, Result, SnapshotSink, StoreStats, SystemClock,
};
use tornlink_http::{Fetcher, HttpConfig, ReqwestTransport, Transport};
use tornlink_storage::{MemoryStore, RateTracker};

use crate::config::ClientConfig;
use crate::merge::{merge_canonical, patch_bank};
use crate::normalize::normalize;
use crate::routing::plan;
use crate::snapshot::Snapshot;

mod observer;
use observer::RequestObserver;

pub mod screens;

/// Caching, coalescing client for the upstream API
///
/// Generic over:
/// - `T`: the transport performing the HTTP requests
/// - `M`: the metrics collector
///
/// Cloning is cheap and every clone shares the same cache, rate window and
/// in-flight requests.
pub struct ApiClient<T: Transport, M: ClientMetrics = NoopMetrics> {
    fetcher: Fetcher<T>,
    cache: MemoryStore<ResourceKey, Canonical>,
    /// Last merged value per key, kept past expiry as the base for merging
    known: Arc<DashMap<ResourceKey, Canonical>>,
    /// Fingerprint of the credential that `cache` and `known` belong to
    session: Arc<Mutex<Option<u64>>>,
    rate: Arc<RateTracker>,
    credentials: Arc<dyn CredentialSource>,
    sink: Arc<dyn SnapshotSink>,
    metrics: Arc<M>,
    config: Arc<ClientConfig>,
}

impl<T: Transport, M: ClientMetrics> Clone for ApiClient<T, M> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            cache: self.cache.clone(),
            known: self.known.clone(),
            session: self.session.clone(),
            rate: self.rate.clone(),
            credentials: self.credentials.clone(),
            sink: self.sink.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
        }
    }
}

impl ApiClient<ReqwestTransport, NoopMetrics> {
    /// Create a client talking to the real API over reqwest
    pub fn connect(credentials: impl CredentialSource, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&HttpConfig::default())?;
        Self::with_config(transport, credentials, config)
    }
}

// Constructors for default metrics
impl<T: Transport> ApiClient<T, NoopMetrics> {
    /// Create a client with default configuration and no metrics
    pub fn new(transport: T, credentials: impl CredentialSource) -> Result<Self> {
        Self::with_config(transport, credentials, ClientConfig::default())
    }

    /// Create with custom config
    pub fn with_config(
        transport: T,
        credentials: impl CredentialSource,
        config: ClientConfig,
    ) -> Result<Self> {
        Self::with_parts(
            transport,
            Arc::new(credentials),
            NoopMetrics,
            Arc::new(SystemClock),
            config,
        )
    }
}

impl<T: Transport, M: ClientMetrics> ApiClient<T, M> {
    /// Create a client from every collaborator explicitly
    pub fn with_parts(
        transport: T,
        credentials: Arc<dyn CredentialSource>,
        metrics: M,
        clock: Arc<dyn Clock>,
        config: ClientConfig,
    ) -> Result<Self> {
        let fetcher = Fetcher::new(Arc::new(transport), config.parsed_base_url()?)
            .with_comment(config.comment.clone())
            .share_inflight(config.share_inflight);

        Ok(Self {
            fetcher,
            cache: MemoryStore::new(config.memory.clone(), clock.clone()),
            known: Arc::new(DashMap::new()),
            session: Arc::new(Mutex::new(None)),
            rate: Arc::new(RateTracker::new(clock)),
            credentials,
            sink: Arc::new(NoopSink),
            metrics: Arc::new(metrics),
            config: Arc::new(config),
        })
    }

    /// Hand fresh values of the configured resources to `sink`
    pub fn with_sink(mut self, sink: impl SnapshotSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Fetch a set of resources
    ///
    /// Live cache entries are served without any request. Missing resources
    /// are grouped into the fewest requests, which all run concurrently under
    /// their own timeouts. Whatever fails is absent from the result.
    ///
    /// Dropping the returned future does not cancel the requests: their
    /// results still reach the cache.
    pub async fn fetch<I>(&self, resources: I) -> Snapshot
    where
        I: IntoIterator<Item = ResourceKey>,
    {
        let requested: BTreeSet<ResourceKey> = resources.into_iter().collect();
        let mut snapshot = Snapshot::default();

        let Some(credential) = self.credentials.credential() else {
            warn!(
                target: "tornlink",
                resources = requested.len(),
                "no API credential, nothing fetched"
            );
            self.metrics
                .record_failure("credential", FailureKind::Credential);
            return snapshot;
        };
        let session = fingerprint(&credential);
        self.enter_session(session);

        let mut misses = Vec::new();
        for key in &requested {
            match self.cache.get(key) {
                Some(value) => {
                    self.metrics.record_hit(*key);
                    snapshot.insert(value);
                }
                None => {
                    self.metrics.record_miss(*key);
                    misses.push(*key);
                }
            }
        }

        debug!(
            target: "tornlink",
            hits = snapshot.len(),
            misses = misses.len(),
            "resolved against cache"
        );

        if !misses.is_empty() {
            let load = tokio::spawn(self.clone().load(credential, session, misses));
            match load.await {
                Ok(values) => values.into_iter().for_each(|value| snapshot.insert(value)),
                Err(err) => error!(target: "tornlink", error = %err, "fetch task failed"),
            }
        }

        let snapshot = snapshot.finish();
        for key in snapshot.missing(&requested.iter().copied().collect::<Vec<_>>()) {
            debug!(target: "tornlink", resource = %key, "resource unavailable");
        }
        snapshot
    }

    /// Fetch, normalize and store `misses`
    ///
    /// Runs as its own task so the results land in the cache even when the
    /// caller has gone away.
    async fn load(
        self,
        credential: String,
        session: u64,
        misses: Vec<ResourceKey>,
    ) -> Vec<Canonical> {
        let requests = plan(&misses, &self.config);
        let endpoints: Vec<_> = requests.iter().map(|r| r.endpoint.clone()).collect();
        for endpoint in &endpoints {
            debug!(target: "tornlink", endpoint = %endpoint, "planned request");
        }

        let observer = RequestObserver {
            rate: &self.rate,
            metrics: &*self.metrics,
        };
        let responses = self
            .fetcher
            .fetch_all(&credential, &endpoints, &observer)
            .await;

        let mut fresh = Vec::new();
        for (request, response) in requests.iter().zip(responses) {
            // Failures were logged by the observer
            let Ok(raw) = response else {
                continue;
            };
            for &key in &request.resources {
                match normalize(key, request.endpoint.version, &raw) {
                    Ok(value) => fresh.push(value),
                    Err(err) => {
                        warn!(
                            target: "tornlink",
                            resource = %key,
                            endpoint = %request.endpoint,
                            error = %err,
                            "could not normalize response"
                        );
                        self.metrics
                            .record_failure(&request.endpoint.describe(), err.kind());
                    }
                }
            }
        }

        // City bank first so a networth in the same batch is patched with it
        fresh.sort_by_key(Canonical::key);
        self.commit(session, fresh)
    }

    /// Clear everything cached for another credential than `session`
    fn enter_session(&self, session: u64) {
        let mut owner = self.session.lock();
        if owner.is_some_and(|current| current != session) {
            debug!(target: "tornlink", "credential changed, dropping cached state");
            self.cache.clear();
            self.known.clear();
        }
        *owner = Some(session);
    }

    /// Store `fresh` unless the credential changed while it was in flight
    fn commit(&self, session: u64, fresh: Vec<Canonical>) -> Vec<Canonical> {
        let owner = self.session.lock();
        if *owner != Some(session) {
            debug!(
                target: "tornlink",
                resources = fresh.len(),
                "credential changed during fetch, results not cached"
            );
            return fresh;
        }
        fresh.into_iter().map(|value| self.store(value)).collect()
    }

    /// Merge a fresh value into what is known and cache the result
    fn store(&self, fresh: Canonical) -> Canonical {
        let key = fresh.key();
        let fresh = match (fresh, self.known_city_bank()) {
            (Canonical::Networth(networth), Some(details)) => patch_bank(networth, &details).into(),
            (fresh, _) => fresh,
        };

        let previous = self.known.get(&key).map(|entry| entry.value().clone());
        let merged = match previous {
            Some(previous) => merge_canonical(previous, fresh),
            None => fresh,
        };

        self.known.insert(key, merged.clone());
        self.cache.set(key, merged.clone(), self.config.ttl_for(key));
        self.publish(&merged);
        merged
    }

    fn known_city_bank(&self) -> Option<CityBankDetails> {
        match self.known.get(&ResourceKey::CityBankDetails).as_deref() {
            Some(Canonical::CityBank(details)) => Some(*details),
            _ => None,
        }
    }

    /// Hand a value to the sink in the background
    fn publish(&self, value: &Canonical) {
        let key = value.key();
        if !self.config.publish.contains(&key) {
            return;
        }

        let sink = self.sink.clone();
        let metrics = self.metrics.clone();
        let value = value.clone();
        tokio::spawn(async move {
            if let Err(err) = sink.publish(key, &value).await {
                warn!(target: "tornlink", resource = %key, error = %err, "snapshot sink failed");
                metrics.record_failure(key.as_str(), err.kind());
            }
        });
    }

    /// Live cached value of one resource, without fetching
    pub fn cached<R: Resource>(&self) -> Option<R> {
        let value = self.cache.get(&R::KEY)?;
        R::from_canonical(&value).cloned()
    }

    /// Requests sent in the current one-minute window
    ///
    /// Informational only; nothing is throttled on it.
    pub fn current_request_rate_count(&self) -> u32 {
        self.rate.current_count()
    }

    pub fn cache_stats(&self) -> StoreStats {
        self.cache.stats()
    }

    /// Drop the cached value of `key` so the next fetch goes upstream
    pub fn invalidate(&self, key: ResourceKey) -> bool {
        self.cache.remove(&key)
    }

    /// Forget every cached and merged value
    pub fn reset(&self) {
        self.cache.clear();
        self.known.clear();
    }
}

/// Identity of a credential without keeping the credential itself
fn fingerprint(credential: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    credential.hash(&mut hasher);
    hasher.finish()
}
