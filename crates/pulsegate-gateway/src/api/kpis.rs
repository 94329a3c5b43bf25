//! `/kpis`: list and create Metric Records.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use pulsegate_core::error::GatewayError;
use pulsegate_core::model::{CreateMetricRequest, MetricRecord};

use super::{parse_body, ApiError};
use crate::app_state::AppState;

pub async fn list_kpis(State(state): State<AppState>) -> Result<Json<Vec<MetricRecord>>, ApiError> {
    let records = state
        .store()
        .list_all()
        .await
        .map_err(|e| store_failed(&state, "list", e))?;
    Ok(Json(records))
}

pub async fn create_kpi(
    State(state): State<AppState>,
    payload: Result<Json<CreateMetricRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MetricRecord>), ApiError> {
    let metric = parse_body(payload)?.into_new_metric()?;

    let record = state
        .store()
        .create(metric)
        .await
        .map_err(|e| store_failed(&state, "create", e))?;

    tracing::info!(id = %record.id, backend = state.store().backend(), "kpi created");
    Ok((StatusCode::CREATED, Json(record)))
}

fn store_failed(state: &AppState, op: &str, e: GatewayError) -> ApiError {
    state.metrics().store_errors.inc(&[
        ("backend", state.store().backend()),
        ("op", op),
        ("code", e.client_code().as_str()),
    ]);
    ApiError(e)
}
