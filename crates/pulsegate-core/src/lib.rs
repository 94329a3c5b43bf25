//! pulsegate core: transport-agnostic models, boundary validation, and errors.
//!
//! This crate defines the request/response contracts and error surface shared
//! by the gateway and its tests. It carries no HTTP, storage, or runtime
//! dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `GatewayError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{ClientCode, GatewayError, Result};
