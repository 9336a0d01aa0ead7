//! Outbound calls to the two upstream JSON APIs.
//!
//! This module handles:
//! - Upstream identity and per-call outcome types
//! - The pooled HTTP client that turns every failure into an outcome

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{CallOutcome, UpstreamApi};
