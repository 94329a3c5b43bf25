//! Observability: logging setup, in-process metrics, and the request tracking
//! middleware that feeds them.
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handler.

pub mod http;
pub mod logging;
pub mod metrics;
