//! Axum router wiring.
//!
//! Six public routes (records + relay) plus operational endpoints. Request
//! metrics are attached with `route_layer` so only matched routes are counted.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/kpis", get(api::kpis::list_kpis).post(api::kpis::create_kpi))
        .route("/weather/:location", get(api::relay::weather))
        .route("/huggingface/completion", post(api::relay::huggingface_completion))
        .route("/codestral/completion", post(api::relay::codestral_completion))
        .route("/codestral/chat", post(api::relay::codestral_chat))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .route_layer(middleware::from_fn_with_state(state.clone(), obs::http::track_requests))
        .with_state(state)
}
