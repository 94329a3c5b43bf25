//! pulsegate gateway library entry.
//!
//! This crate wires configuration, the record store adapters, the outbound
//! relay, and the HTTP router into one service. It is intended to be consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod relay;
pub mod router;
pub mod store;
