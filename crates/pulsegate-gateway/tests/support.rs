//! Shared helpers for driving the router in-process.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use pulsegate_gateway::{
    app_state::AppState,
    config::GatewayConfig,
    router::build_router,
    store::{KpiStore, MemoryKpiStore},
};

pub fn app_with(cfg: GatewayConfig, store: Arc<dyn KpiStore>) -> (AppState, Router) {
    let state = AppState::new(cfg, store).expect("state");
    let app = build_router(state.clone());
    (state, app)
}

pub fn memory_app() -> Router {
    app_with(GatewayConfig::default(), Arc::new(MemoryKpiStore::new())).1
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method(Method::GET).uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, &body.to_string())
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

/// Send one request; return status and raw body text.
pub async fn call_text(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Send one request; return status and parsed JSON body.
pub async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, text) = call_text(app, req).await;
    let v = serde_json::from_str(&text).unwrap_or_else(|e| panic!("non-json body {text:?}: {e}"));
    (status, v)
}
