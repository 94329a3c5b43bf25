//! Pass-through routes to the weather and inference upstreams.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use pulsegate_core::model::{ChatRequest, InferenceRequest, PromptRequest};

use super::{parse_body, ApiError};
use crate::app_state::AppState;
use crate::relay::RawBody;

pub async fn weather(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<RawBody>, ApiError> {
    Ok(Json(state.relay().fetch_weather(&location).await?))
}

pub async fn huggingface_completion(
    State(state): State<AppState>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> Result<Json<RawBody>, ApiError> {
    let req = parse_body(payload)?;
    Ok(Json(state.relay().fetch_inference_completion(&req.prompt).await?))
}

pub async fn codestral_completion(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<RawBody>, ApiError> {
    let req = parse_body(payload)?;
    Ok(Json(state.relay().fetch_code_completion(&req.prompt).await?))
}

pub async fn codestral_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<RawBody>, ApiError> {
    let req = parse_body(payload)?;
    Ok(Json(state.relay().fetch_chat_completion(&req.messages).await?))
}
