//! Top-level facade crate for pulsegate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use pulsegate_core::*;
}

pub mod gateway {
    pub use pulsegate_gateway::*;
}
