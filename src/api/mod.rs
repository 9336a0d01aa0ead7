//! HTTP API module for the fetch and health endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, FETCH_FAILED_MESSAGE};
pub use routes::create_router;
