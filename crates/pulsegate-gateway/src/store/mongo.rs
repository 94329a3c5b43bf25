//! MongoDB-backed record store.
//!
//! Documents are stored as `{ _id, name?, value?, recordedAt }`. Older documents
//! that carry the timestamp under `date` (or none at all) are still readable:
//! the timestamp falls back to the one embedded in the ObjectId.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Client, Collection};
use serde::{Deserialize, Deserializer, Serialize};

use pulsegate_core::error::{GatewayError, Result};
use pulsegate_core::model::{MetricRecord, NewMetric};

use super::KpiStore;

#[derive(Debug, Serialize, Deserialize)]
struct MetricDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(
        default,
        deserialize_with = "lenient_name",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_value",
        skip_serializing_if = "Option::is_none"
    )]
    value: Option<f64>,
    #[serde(rename = "recordedAt", alias = "date", default)]
    recorded_at: Option<bson::DateTime>,
}

// Documents written by other clients may carry any BSON type in these fields.
// Reads keep what converts cleanly and drop the rest instead of failing the
// whole listing.
fn lenient_name<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Bson>::deserialize(de)? {
        Some(Bson::String(s)) => Some(s),
        Some(Bson::Int32(n)) => Some(n.to_string()),
        Some(Bson::Int64(n)) => Some(n.to_string()),
        Some(Bson::Double(n)) => Some(n.to_string()),
        Some(Bson::Boolean(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_value<'de, D>(de: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Bson>::deserialize(de)? {
        Some(Bson::Double(n)) => Some(n),
        Some(Bson::Int32(n)) => Some(f64::from(n)),
        Some(Bson::Int64(n)) => Some(n as f64),
        Some(Bson::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Bson::Boolean(b)) => Some(if b { 1.0 } else { 0.0 }),
        _ => None,
    };
    Ok(value.filter(|n| n.is_finite()))
}

impl MetricDocument {
    fn from_new(metric: NewMetric, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            name: metric.name,
            value: metric.value,
            recorded_at: Some(bson::DateTime::from_millis(now.timestamp_millis())),
        }
    }

    fn into_record(self) -> MetricRecord {
        let at = self.recorded_at.unwrap_or_else(|| self.id.timestamp());
        MetricRecord {
            id: self.id.to_hex(),
            name: self.name,
            value: self.value,
            recorded_at: DateTime::from_timestamp_millis(at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

pub struct MongoKpiStore {
    client: Client,
    collection: Collection<MetricDocument>,
}

impl MongoKpiStore {
    /// Parse `uri` and open the collection.
    ///
    /// The driver connects lazily; a `ping` runs in the background and only
    /// logs its outcome, so an unreachable server does not block startup.
    pub async fn connect(uri: &str, default_db: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| GatewayError::StoreUnavailable(e.to_string()))?;

        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(default_db));
        let db_name = db.name().to_string();
        let collection = db.collection::<MetricDocument>(collection);

        tokio::spawn(async move {
            match db.run_command(doc! { "ping": 1 }).await {
                Ok(_) => tracing::info!(backend = "mongo", db = %db_name, "record store connected"),
                Err(e) => tracing::warn!(backend = "mongo", db = %db_name, error = %e, "record store ping failed"),
            }
        });

        Ok(Self { client, collection })
    }
}

#[async_trait]
impl KpiStore for MongoKpiStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn list_all(&self) -> Result<Vec<MetricRecord>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| GatewayError::StoreUnavailable(e.to_string()))?;

        let docs: Vec<MetricDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| GatewayError::StoreUnavailable(e.to_string()))?;

        Ok(docs.into_iter().map(MetricDocument::into_record).collect())
    }

    async fn create(&self, metric: NewMetric) -> Result<MetricRecord> {
        let document = MetricDocument::from_new(metric, Utc::now());
        self.collection
            .insert_one(&document)
            .await
            .map_err(insert_error)?;
        Ok(document.into_record())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!(backend = "mongo", "record store connection released");
    }
}

/// Shape rejections are the caller's fault; everything else is the store's.
fn insert_error(e: MongoError) -> GatewayError {
    match e.kind.as_ref() {
        ErrorKind::Write(_) | ErrorKind::InvalidArgument { .. } | ErrorKind::BsonSerialization(_) => {
            GatewayError::InvalidRecord(e.to_string())
        }
        _ => GatewayError::StoreUnavailable(e.to_string()),
    }
}
