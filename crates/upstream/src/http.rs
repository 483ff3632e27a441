//! Shared HTTP transport for all upstream clients.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{UpstreamError, UpstreamResult};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport settings shared by every client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-call timeout
    pub timeout: Duration,
    /// User-Agent header (Nominatim rejects anonymous clients)
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("weather-api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Connection-pooled HTTP client. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct UpstreamHttp {
    client: Client,
    timeout: Duration,
}

impl UpstreamHttp {
    pub fn new(config: &HttpConfig) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with query parameters and return the body as text.
    ///
    /// Non-2xx statuses become [`UpstreamError::Protocol`] with the status
    /// code; a timeout becomes [`UpstreamError::Timeout`].
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> UpstreamResult<String> {
        debug!(url = %url, "Upstream request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::protocol(
                status.as_u16().to_string(),
                status.canonical_reason().unwrap_or("HTTP error"),
            ));
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}
