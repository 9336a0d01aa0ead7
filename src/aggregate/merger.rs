//! Merged response type and the merge precedence.
//!
//! ```text
//! api1      api2      result
//! ───────── ───────── ─────────────────────────────────
//! Success   Success   { api1Response, api2Response }
//! Success   Failed    { api1Response }
//! Failed    Success   { api2Response }
//! Failed    Failed    { Error: BOTH_FAILED_MESSAGE }
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::AggregateError;
use crate::upstream::{CallOutcome, UpstreamApi};

/// A parsed upstream body.
pub type JsonObject = Map<String, Value>;

/// Message returned when neither upstream produced a body.
pub const BOTH_FAILED_MESSAGE: &str = "Both API Calls failed due to network connection";

/// Key holding [`BOTH_FAILED_MESSAGE`] in the serialized response.
pub const ERROR_KEY: &str = "Error";

/// Combined result of both upstream calls.
#[derive(Debug, Clone, PartialEq)]
pub enum MergedResponse {
    /// Both upstreams answered.
    Both {
        /// Parsed body of the first upstream.
        api1: JsonObject,
        /// Parsed body of the second upstream.
        api2: JsonObject,
    },
    /// Only the first upstream answered.
    Api1Only(JsonObject),
    /// Only the second upstream answered.
    Api2Only(JsonObject),
    /// Neither upstream answered.
    BothFailed,
}

impl MergedResponse {
    /// Whether this is the both-failed shape.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::BothFailed)
    }

    /// Parsed body of the first upstream, if present.
    pub fn api1(&self) -> Option<&JsonObject> {
        match self {
            Self::Both { api1, .. } | Self::Api1Only(api1) => Some(api1),
            _ => None,
        }
    }

    /// Parsed body of the second upstream, if present.
    pub fn api2(&self) -> Option<&JsonObject> {
        match self {
            Self::Both { api2, .. } | Self::Api2Only(api2) => Some(api2),
            _ => None,
        }
    }
}

impl Serialize for MergedResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_error() {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(ERROR_KEY, BOTH_FAILED_MESSAGE)?;
            return map.end();
        }

        let entries = [
            (UpstreamApi::Api1, self.api1()),
            (UpstreamApi::Api2, self.api2()),
        ];
        let len = entries.iter().filter(|(_, body)| body.is_some()).count();

        let mut map = serializer.serialize_map(Some(len))?;
        for (api, body) in entries {
            if let Some(body) = body {
                map.serialize_entry(api.response_key(), body)?;
            }
        }
        map.end()
    }
}

/// Combine two call outcomes following the merge precedence.
///
/// Fails only when a successful call returned a body that is not a JSON object.
pub fn merge(api1: CallOutcome, api2: CallOutcome) -> Result<MergedResponse, AggregateError> {
    let merged = match (api1, api2) {
        (CallOutcome::Success(body1), CallOutcome::Success(body2)) => MergedResponse::Both {
            api1: parse_object(UpstreamApi::Api1, &body1)?,
            api2: parse_object(UpstreamApi::Api2, &body2)?,
        },
        (CallOutcome::Success(body1), CallOutcome::Failed) => {
            MergedResponse::Api1Only(parse_object(UpstreamApi::Api1, &body1)?)
        }
        (CallOutcome::Failed, CallOutcome::Success(body2)) => {
            MergedResponse::Api2Only(parse_object(UpstreamApi::Api2, &body2)?)
        }
        (CallOutcome::Failed, CallOutcome::Failed) => MergedResponse::BothFailed,
    };

    Ok(merged)
}

fn parse_object(api: UpstreamApi, body: &str) -> Result<JsonObject, AggregateError> {
    serde_json::from_str(body).map_err(|source| AggregateError::Parse { api, source })
}
