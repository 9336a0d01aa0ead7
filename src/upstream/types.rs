//! Upstream identity and per-call outcome types.

use strum::{Display, IntoStaticStr};

/// One of the two upstream APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum UpstreamApi {
    /// First upstream.
    #[strum(serialize = "api1")]
    Api1,
    /// Second upstream.
    #[strum(serialize = "api2")]
    Api2,
}

impl UpstreamApi {
    /// Key under which this upstream's object appears in the merged response.
    pub fn response_key(self) -> &'static str {
        match self {
            Self::Api1 => "api1Response",
            Self::Api2 => "api2Response",
        }
    }

    /// Short label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Result of a single outbound call.
///
/// Failures of any kind collapse into [`CallOutcome::Failed`]; the reason is
/// only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// 2xx response with a non-blank body.
    Success(String),
    /// Network error, non-2xx status, timeout, or blank body.
    Failed,
}

impl CallOutcome {
    /// Classify a response body. Blank bodies count as failures.
    pub fn from_body(body: String) -> Self {
        if body.trim().is_empty() {
            Self::Failed
        } else {
            Self::Success(body)
        }
    }

    /// Whether the call produced a body.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
