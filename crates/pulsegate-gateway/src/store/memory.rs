use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use pulsegate_core::error::Result;
use pulsegate_core::model::{MetricRecord, NewMetric};

use super::KpiStore;

/// In-process store. Records live for the life of the process, in insertion order.
#[derive(Default)]
pub struct MemoryKpiStore {
    records: RwLock<Vec<MetricRecord>>,
    next_id: AtomicU64,
}

impl MemoryKpiStore {
    pub fn new() -> Self {
        Self::default()
    }

    // 24 hex chars, same width as a document id.
    fn generate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{n:024x}")
    }
}

#[async_trait]
impl KpiStore for MemoryKpiStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_all(&self) -> Result<Vec<MetricRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, metric: NewMetric) -> Result<MetricRecord> {
        let record = metric.into_record(self.generate_id(), Utc::now());
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}
