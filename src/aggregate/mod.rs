//! Fetch-merge: two concurrent upstream calls combined into one response.
//!
//! This module handles:
//! - The merged response shape and its precedence rules
//! - Concurrent dispatch of both upstream calls

pub mod aggregator;
pub mod merger;

pub use aggregator::DataAggregator;
pub use merger::{merge, JsonObject, MergedResponse, BOTH_FAILED_MESSAGE, ERROR_KEY};
