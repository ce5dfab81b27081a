//! Client configuration

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use tornlink_core::{ApiError, ResourceKey, Result};
use tornlink_http::ApiVersion;
use tornlink_storage::MemoryConfig;
use url::Url;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.torn.com/";

/// Configuration for [`ApiClient`](crate::ApiClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base, joined with each endpoint path
    pub base_url: String,
    /// Per-resource TTLs replacing [`ResourceKey::default_ttl`]
    pub ttl_overrides: HashMap<ResourceKey, Duration>,
    /// Per-resource timeouts replacing [`ResourceKey::default_timeout`]
    pub timeout_overrides: HashMap<ResourceKey, Duration>,
    /// Sent as `&comment=` so the key owner can see which tool used it
    pub comment: Option<String>,
    /// Schema used for ranked wars
    pub ranked_wars_version: ApiVersion,
    /// Resources handed to the snapshot sink after every successful fetch
    pub publish: BTreeSet<ResourceKey>,
    /// Share identical concurrent requests between callers
    pub share_inflight: bool,
    pub memory: MemoryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ttl_overrides: HashMap::new(),
            timeout_overrides: HashMap::new(),
            comment: None,
            ranked_wars_version: ApiVersion::V2,
            publish: BTreeSet::from([ResourceKey::FactionSnapshot]),
            share_inflight: true,
            memory: MemoryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create config pointing at another API host
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Override the TTL of one resource
    pub fn ttl(mut self, key: ResourceKey, ttl: Duration) -> Self {
        self.ttl_overrides.insert(key, ttl);
        self
    }

    /// Override the request timeout of one resource
    pub fn timeout(mut self, key: ResourceKey, timeout: Duration) -> Self {
        self.timeout_overrides.insert(key, timeout);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Read ranked wars from the v1 schema
    pub fn legacy_ranked_wars(mut self) -> Self {
        self.ranked_wars_version = ApiVersion::V1;
        self
    }

    /// Replace the set of published resources
    pub fn publish(mut self, keys: impl IntoIterator<Item = ResourceKey>) -> Self {
        self.publish = keys.into_iter().collect();
        self
    }

    /// Disable in-flight sharing
    pub fn no_inflight_sharing(mut self) -> Self {
        self.share_inflight = false;
        self
    }

    pub fn ttl_for(&self, key: ResourceKey) -> Duration {
        self.ttl_overrides
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_ttl())
    }

    pub fn timeout_for(&self, key: ResourceKey) -> Duration {
        self.timeout_overrides
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_timeout())
    }

    /// Parse the base URL, making sure it ends in `/` so paths join under it
    pub fn parsed_base_url(&self) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{base}: not a base URL")));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.ttl_for(ResourceKey::UserSnapshot), Duration::from_secs(10));
        assert_eq!(
            config.timeout_for(ResourceKey::FactionSnapshot),
            Duration::from_secs(15)
        );
        assert_eq!(config.ranked_wars_version, ApiVersion::V2);
        assert!(config.publish.contains(&ResourceKey::FactionSnapshot));
        assert!(config.share_inflight);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default()
            .ttl(ResourceKey::BankRates, Duration::from_secs(5))
            .timeout(ResourceKey::UserSnapshot, Duration::from_secs(1));
        assert_eq!(config.ttl_for(ResourceKey::BankRates), Duration::from_secs(5));
        assert_eq!(config.timeout_for(ResourceKey::UserSnapshot), Duration::from_secs(1));
        assert_eq!(config.ttl_for(ResourceKey::UserSnapshot), Duration::from_secs(10));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ClientConfig::with_base_url("http://localhost:8080/api");
        assert_eq!(
            config.parsed_base_url().unwrap().as_str(),
            "http://localhost:8080/api/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::with_base_url("not a url");
        assert!(matches!(config.parsed_base_url(), Err(ApiError::InvalidUrl(_))));
    }
}
