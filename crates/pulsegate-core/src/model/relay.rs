//! Request schemas for the outbound relay routes.
//!
//! The relay never inspects prompt or message contents; these types only pin
//! down the outer shape so malformed bodies are rejected before any upstream
//! call is made.

use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /huggingface/completion`.
///
/// Hosted inference accepts any JSON as `inputs` (a string, a batch of
/// strings, an object), so the prompt is kept as an opaque value.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceRequest {
    pub prompt: Value,
}

/// Body of `POST /codestral/completion`.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Body of `POST /codestral/chat`.
///
/// Messages are forwarded unchanged, so each entry stays an opaque JSON value.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Value>,
}
