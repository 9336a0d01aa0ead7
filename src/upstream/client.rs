//! Pooled HTTP client for the upstream APIs.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::error::UpstreamError;
use crate::metrics;

use super::types::{CallOutcome, UpstreamApi};

/// HTTP client that issues one GET per call and never fails outward.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    /// HTTP client for upstream requests.
    http: reqwest::Client,
    /// Per-call timeout, covering connect through body read.
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client from config.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Self::build(config.upstream_timeout(), config.http_pool_size)
    }

    /// Create a client with the given per-call timeout and default pooling.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::build(timeout, 10)
    }

    fn build(timeout: Duration, pool_size: usize) -> Result<Self, reqwest::Error> {
        // One deadline for the whole call; no separate connect cap.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_nodelay(true)
            // Keep connections alive for reuse
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { http, timeout })
    }

    /// Get the per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and classify the result.
    ///
    /// Every failure is logged and reported as [`CallOutcome::Failed`].
    #[instrument(skip(self, api, url), fields(api = %api))]
    pub async fn fetch(&self, api: UpstreamApi, url: &str) -> CallOutcome {
        let start = Instant::now();
        debug!(url, "Starting API call");

        let result = self.get_body(url).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        metrics::record_upstream_latency(start, api);

        match result {
            Ok(body) => {
                info!(url, elapsed_ms, "API call succeeded");
                metrics::inc_upstream_requests(api, "success");
                CallOutcome::Success(body)
            }
            Err(e) => {
                error!(
                    url,
                    elapsed_ms,
                    timeout_ms = self.timeout().as_millis() as u64,
                    "API call failed or timed out"
                );
                warn!(url, error = %e, "Degrading to empty response");
                metrics::inc_upstream_requests(api, e.kind());
                CallOutcome::Failed
            }
        }
    }

    async fn get_body(&self, url: &str) -> Result<String, UpstreamError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;

        match CallOutcome::from_body(body) {
            CallOutcome::Success(body) => Ok(body),
            CallOutcome::Failed => Err(UpstreamError::EmptyBody),
        }
    }

    fn classify(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Request(e)
        }
    }
}
