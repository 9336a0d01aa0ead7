//! Unified error types for the aggregation service.

use std::time::Duration;

use thiserror::Error;

use crate::upstream::UpstreamApi;

/// Top-level error type for service startup and CLI commands.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed semantic validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fetch-merge failure.
    #[error("aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// Neither upstream produced a body.
    #[error("both upstream calls failed")]
    UpstreamsUnavailable,

    /// JSON encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single outbound call.
///
/// These never leave the upstream client: they are logged, counted, and
/// downgraded to [`CallOutcome::Failed`](crate::upstream::CallOutcome::Failed).
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The call did not complete within its timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS, or body transfer failure.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("unexpected status: HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Upstream answered 2xx with an empty body.
    #[error("empty response body")]
    EmptyBody,
}

impl UpstreamError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Request(_) => "request",
            Self::Status(_) => "status",
            Self::EmptyBody => "empty",
        }
    }
}

/// Errors raised while merging two upstream responses.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// A successful call returned a body that is not a JSON object.
    #[error("failed to parse {api} response: {source}")]
    Parse {
        /// Which upstream returned the malformed body.
        api: UpstreamApi,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
