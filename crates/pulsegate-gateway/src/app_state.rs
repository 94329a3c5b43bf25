//! Shared application state for the pulsegate gateway.
//!
//! Every dependency a handler needs (record store, relay, metrics) is built
//! once at startup and injected here; there are no globals. Cloning is cheap.

use std::sync::Arc;
use std::time::Instant;

use pulsegate_core::error::Result;

use crate::config::GatewayConfig;
use crate::obs::metrics::GatewayMetrics;
use crate::relay::Relay;
use crate::store::KpiStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn KpiStore>,
    relay: Relay,
    metrics: Arc<GatewayMetrics>,
    started_at: Instant,
}

impl AppState {
    /// Build application state around an already connected store.
    pub fn new(cfg: GatewayConfig, store: Arc<dyn KpiStore>) -> Result<Self> {
        for key in cfg.credentials.missing() {
            tracing::warn!(key, "api key not set; routes using it will fail");
        }

        let metrics = Arc::new(GatewayMetrics::default());
        let relay = Relay::new(cfg.upstreams, cfg.credentials, Arc::clone(&metrics))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                store,
                relay,
                metrics,
                started_at: Instant::now(),
            }),
        })
    }

    pub fn store(&self) -> &dyn KpiStore {
        self.inner.store.as_ref()
    }

    pub fn relay(&self) -> &Relay {
        &self.inner.relay
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }

    /// Flip readiness to "draining"; `/readyz` answers 503 from now on.
    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}
