//! Request/response models shared by the gateway and its clients.
//!
//! - `metric`: the persisted Metric Record and its create schema.
//! - `relay`: request schemas for the outbound relay routes.
//!
//! Boundary validation lives next to each schema so that handlers only ever
//! pass already-coerced values to the store or the relay.

pub mod metric;
pub mod relay;

pub use metric::{CreateMetricRequest, MetricRecord, NewMetric};
pub use relay::{ChatRequest, InferenceRequest, PromptRequest};
