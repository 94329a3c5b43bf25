//! Outbound relay to third-party APIs.
//!
//! One upstream call per inbound request, no retries, transport-default
//! timeouts. The upstream body is handed back as raw JSON so callers receive
//! it byte-for-byte; the only check is that it parses as JSON at all.
//!
//! - `weather`: Tomorrow.io timelines
//! - `inference`: Hugging Face hosted inference and Codestral completion/chat

mod inference;
mod weather;

use std::sync::Arc;
use std::time::Instant;

use reqwest::RequestBuilder;
use serde_json::value::RawValue;

use pulsegate_core::error::{GatewayError, Result};

use crate::config::{Credentials, UpstreamsConfig};
use crate::obs::metrics::GatewayMetrics;

/// Upstream body, relayed unmodified.
pub type RawBody = Box<RawValue>;

/// The third-party endpoints this gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Weather,
    HuggingFace,
    CodestralFim,
    CodestralChat,
}

impl Upstream {
    pub fn as_str(self) -> &'static str {
        match self {
            Upstream::Weather => "weather",
            Upstream::HuggingFace => "huggingface",
            Upstream::CodestralFim => "codestral_fim",
            Upstream::CodestralChat => "codestral_chat",
        }
    }

    /// Environment variable holding this upstream's credential.
    fn key_env(self) -> &'static str {
        match self {
            Upstream::Weather => "TOMORROW_API_KEY",
            Upstream::HuggingFace => "HUGGINGFACE_API_KEY",
            Upstream::CodestralFim | Upstream::CodestralChat => "CODESTRAL_API_KEY",
        }
    }
}

pub struct Relay {
    http: reqwest::Client,
    upstreams: UpstreamsConfig,
    credentials: Credentials,
    metrics: Arc<GatewayMetrics>,
}

impl Relay {
    pub fn new(
        upstreams: UpstreamsConfig,
        credentials: Credentials,
        metrics: Arc<GatewayMetrics>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pulsegate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            upstreams,
            credentials,
            metrics,
        })
    }

    fn require_key<'a>(&self, upstream: Upstream, key: &'a Option<String>) -> Result<&'a str> {
        key.as_deref().ok_or_else(|| {
            GatewayError::Upstream(format!("{} is not configured", upstream.key_env()))
        })
    }

    /// Send one request and time it. Failures are counted and logged here,
    /// then returned untouched for the handler to render.
    async fn send(&self, upstream: Upstream, req: RequestBuilder) -> Result<RawBody> {
        let started = Instant::now();
        let res = exchange(req).await;
        let elapsed = started.elapsed();

        let labels = [("upstream", upstream.as_str())];
        self.metrics.upstream_duration.observe(&labels, elapsed);

        match res {
            Ok(body) => {
                tracing::debug!(upstream = upstream.as_str(), elapsed_ms = elapsed.as_millis() as u64, "upstream ok");
                Ok(body)
            }
            Err(e) => {
                self.metrics.upstream_errors.inc(&labels);
                tracing::warn!(upstream = upstream.as_str(), elapsed_ms = elapsed.as_millis() as u64, error = %e, "upstream failed");
                Err(e)
            }
        }
    }
}

async fn exchange(req: RequestBuilder) -> Result<RawBody> {
    let resp = req.send().await.map_err(upstream_error)?;
    let resp = resp.error_for_status().map_err(upstream_error)?;
    let bytes = resp.bytes().await.map_err(upstream_error)?;

    serde_json::from_slice::<RawBody>(&bytes)
        .map_err(|e| GatewayError::Upstream(format!("invalid upstream body: {e}")))
}

// The url is dropped: the weather key travels as a query parameter.
fn upstream_error(e: reqwest::Error) -> GatewayError {
    let e = e.without_url();
    let mut msg = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    GatewayError::Upstream(msg)
}
