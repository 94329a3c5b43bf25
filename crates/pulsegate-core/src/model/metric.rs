//! Metric Record (KPI) model.
//!
//! `CreateMetricRequest` accepts loosely typed JSON scalars and coerces them the
//! way a document mapper would before saving: numeric strings become numbers,
//! numbers become strings for `name`, `null` means "absent". Anything that
//! cannot be coerced is an `InvalidRecord` error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// A stored metric record as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// Store-generated identifier.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Creation time.
    pub recorded_at: DateTime<Utc>,
}

/// A validated, not yet persisted metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMetric {
    pub name: Option<String>,
    pub value: Option<f64>,
}

impl NewMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value),
        }
    }

    /// Stamp the metric with an identifier and creation time.
    pub fn into_record(self, id: String, recorded_at: DateTime<Utc>) -> MetricRecord {
        MetricRecord {
            id,
            name: self.name,
            value: self.value,
            recorded_at,
        }
    }
}

/// Body of `POST /kpis`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMetricRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl CreateMetricRequest {
    /// Coerce the raw JSON fields into a `NewMetric`.
    pub fn into_new_metric(self) -> Result<NewMetric> {
        Ok(NewMetric {
            name: coerce_name(self.name)?,
            value: coerce_value(self.value)?,
        })
    }
}

fn coerce_name(raw: Option<Value>) -> Result<Option<String>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(cast_error("string", &other, "name")),
    }
}

fn coerce_value(raw: Option<Value>) -> Result<Option<f64>> {
    let v = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let parsed = match &v {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Ok(None);
            }
            t.parse::<f64>().ok()
        }
        Value::Array(_) | Value::Object(_) | Value::Null => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(cast_error("Number", &v, "value")),
    }
}

fn cast_error(kind: &str, raw: &Value, path: &str) -> GatewayError {
    let shown = match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    GatewayError::InvalidRecord(format!(
        "Cast to {kind} failed for value \"{shown}\" at path \"{path}\""
    ))
}
