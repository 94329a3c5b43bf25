use serde::Serialize;
use serde_json::Value;

use pulsegate_core::error::Result;

use super::{RawBody, Relay, Upstream};

#[derive(Serialize)]
struct InferencePayload<'a> {
    inputs: &'a Value,
}

#[derive(Serialize)]
struct FimPayload<'a> {
    prompt: &'a str,
    max_tokens: u32,
}

// No token limit here, unlike FIM.
#[derive(Serialize)]
struct ChatPayload<'a> {
    messages: &'a [Value],
}

impl Relay {
    /// Hosted model inference with the raw prompt as `inputs`.
    pub async fn fetch_inference_completion(&self, prompt: &Value) -> Result<RawBody> {
        let key = self.require_key(Upstream::HuggingFace, &self.credentials.huggingface_api_key)?;

        let req = self
            .http
            .post(&self.upstreams.huggingface_url)
            .bearer_auth(key)
            .json(&InferencePayload { inputs: prompt });

        self.send(Upstream::HuggingFace, req).await
    }

    /// Fill-in-the-middle code completion, capped at `fim_max_tokens`.
    pub async fn fetch_code_completion(&self, prompt: &str) -> Result<RawBody> {
        let key = self.require_key(Upstream::CodestralFim, &self.credentials.codestral_api_key)?;

        let req = self
            .http
            .post(&self.upstreams.codestral_fim_url)
            .bearer_auth(key)
            .json(&FimPayload {
                prompt,
                max_tokens: self.upstreams.fim_max_tokens,
            });

        self.send(Upstream::CodestralFim, req).await
    }

    /// Chat completion with the caller's messages forwarded as-is.
    pub async fn fetch_chat_completion(&self, messages: &[Value]) -> Result<RawBody> {
        let key = self.require_key(Upstream::CodestralChat, &self.credentials.codestral_api_key)?;

        let req = self
            .http
            .post(&self.upstreams.codestral_chat_url)
            .bearer_auth(key)
            .json(&ChatPayload { messages });

        self.send(Upstream::CodestralChat, req).await
    }
}
