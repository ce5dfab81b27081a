//! Transport seam between the fetcher and the network

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use tornlink_core::{ApiError, Result};

/// Performs one GET and decodes the JSON body
///
/// Implementations report transport problems only; timeouts and the
/// embedded `error` envelope are handled by the [`Fetcher`](crate::Fetcher).
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get_json(&self, url: &Url) -> Result<Value>;
}

/// Options for the reqwest client
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    /// The timeout for establishing a connection
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("tornlink/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(3),
            pool_idle_timeout: Duration::from_secs(30),
        }
    }
}

/// [`Transport`] backed by [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client from `config`
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .gzip(true)
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, url: &Url) -> Result<Value> {
        // Errors are stripped of the URL: it contains the credential
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;

        serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(format!("invalid JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert!(config.user_agent.starts_with("tornlink/"));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_build_client() {
        assert!(ReqwestTransport::new(&HttpConfig::default()).is_ok());
    }
}
