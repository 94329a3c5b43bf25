//! Record store adapters for Metric Records.
//!
//! Handlers only see `Arc<dyn KpiStore>`. The concrete backend is picked once at
//! startup by [`connect`], which never fails: a missing or unusable connection
//! string yields an [`UnavailableKpiStore`] so the process still starts and
//! store-backed routes answer 500 until it is fixed.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;

use pulsegate_core::error::{GatewayError, Result};
use pulsegate_core::model::{MetricRecord, NewMetric};

use crate::config::{StoreBackend, StoreConfig};

pub use memory::MemoryKpiStore;
pub use mongo::MongoKpiStore;

/// Persistence seam for Metric Records.
#[async_trait]
pub trait KpiStore: Send + Sync {
    /// Short backend name for logs and metrics labels.
    fn backend(&self) -> &'static str;

    /// All records in storage-native order.
    async fn list_all(&self) -> Result<Vec<MetricRecord>>;

    /// Persist a record stamped with the current time.
    async fn create(&self, metric: NewMetric) -> Result<MetricRecord>;

    /// Release the underlying connection. Called once at shutdown.
    async fn close(&self) {}
}

/// Store used when no connection could be set up.
pub struct UnavailableKpiStore {
    reason: String,
}

impl UnavailableKpiStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl KpiStore for UnavailableKpiStore {
    fn backend(&self) -> &'static str {
        "unavailable"
    }

    async fn list_all(&self) -> Result<Vec<MetricRecord>> {
        Err(GatewayError::StoreUnavailable(self.reason.clone()))
    }

    async fn create(&self, _metric: NewMetric) -> Result<MetricRecord> {
        Err(GatewayError::StoreUnavailable(self.reason.clone()))
    }
}

/// Build the configured store. Connection problems are logged, not returned.
pub async fn connect(cfg: &StoreConfig) -> Arc<dyn KpiStore> {
    match cfg.backend {
        StoreBackend::Memory => {
            tracing::info!(backend = "memory", "using in-process record store");
            Arc::new(MemoryKpiStore::new())
        }
        StoreBackend::Mongo => {
            let Some(uri) = cfg.uri.as_deref() else {
                tracing::error!("MONGO_URI is not set; record routes will fail");
                return Arc::new(UnavailableKpiStore::new("MONGO_URI is not set"));
            };
            match MongoKpiStore::connect(uri, &cfg.database, &cfg.collection).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!(error = %e, "record store connection failed");
                    Arc::new(UnavailableKpiStore::new(e.message()))
                }
            }
        }
    }
}
