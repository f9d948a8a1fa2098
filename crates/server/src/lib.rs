//! REST API server
//!
//! Thin transport over the classification pipeline: classify one
//! document or a batch, hot-reload the rule file, and expose
//! health/readiness and Prometheus metrics.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use state::AppState;
