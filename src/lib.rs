//! Concurrent fetch-and-merge service over two upstream JSON APIs.
//!
//! A single endpoint, `GET /api/fetch-data`, calls both upstreams at once,
//! each bounded by its own timeout, and merges whatever came back:
//!
//! ```text
//! api1 ok + api2 ok   → 200 { "api1Response": {..}, "api2Response": {..} }
//! api1 ok only        → 200 { "api1Response": {..} }
//! api2 ok only        → 200 { "api2Response": {..} }
//! neither             → 400 { "Error": "Both API Calls failed due to network connection" }
//! malformed body      → 500 "An error occurred while fetching data"
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`upstream`]: Outbound client and per-call outcomes
//! - [`aggregate`]: Concurrent dispatch and merge precedence
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Latency and outcome metrics
//! - [`utils`]: Utility functions

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod upstream;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
