//! Concurrent dispatch of both upstream calls.

use std::time::Instant;

use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::AggregateError;
use crate::upstream::{UpstreamApi, UpstreamClient};

use super::merger::{merge, MergedResponse};

/// Fetches both upstreams concurrently and merges the outcomes.
#[derive(Debug, Clone)]
pub struct DataAggregator {
    client: UpstreamClient,
    api1_url: String,
    api2_url: String,
}

impl DataAggregator {
    /// Create an aggregator from config.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = UpstreamClient::new(config)?;
        Ok(Self::with_client(
            client,
            config.api1_url.clone(),
            config.api2_url.clone(),
        ))
    }

    /// Create an aggregator around an existing client.
    pub fn with_client(
        client: UpstreamClient,
        api1_url: impl Into<String>,
        api2_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api1_url: api1_url.into(),
            api2_url: api2_url.into(),
        }
    }

    /// First upstream URL.
    pub fn api1_url(&self) -> &str {
        &self.api1_url
    }

    /// Second upstream URL.
    pub fn api2_url(&self) -> &str {
        &self.api2_url
    }

    /// Call both upstreams concurrently and merge their outcomes.
    ///
    /// Dropping the returned future cancels both in-flight calls.
    #[instrument(skip(self))]
    pub async fn fetch_data(&self) -> Result<MergedResponse, AggregateError> {
        let start = Instant::now();

        let (api1, api2) = tokio::join!(
            self.client.fetch(UpstreamApi::Api1, &self.api1_url),
            self.client.fetch(UpstreamApi::Api2, &self.api2_url),
        );

        debug!(
            api1_ok = api1.is_success(),
            api2_ok = api2.is_success(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Both API calls completed"
        );

        merge(api1, api2)
    }
}
