#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::http::StatusCode;
use httpmock::prelude::*;
use serde_json::json;

use pulsegate_gateway::config::{Credentials, GatewayConfig};
use pulsegate_gateway::store::MemoryKpiStore;

mod support;
use support::{app_with, call, call_text, get, post_json, post_raw};

fn cfg_for(server: &MockServer) -> GatewayConfig {
    let mut cfg = GatewayConfig::default();
    cfg.upstreams.weather_url = server.url("/v4/timelines");
    cfg.upstreams.huggingface_url = server.url("/models/mistralai/Codestral-22B-v0.1");
    cfg.upstreams.codestral_fim_url = server.url("/v1/fim/completions");
    cfg.upstreams.codestral_chat_url = server.url("/v1/chat/completions");
    cfg.credentials = Credentials {
        tomorrow_api_key: Some("tomorrow-key".into()),
        huggingface_api_key: Some("hf-key".into()),
        codestral_api_key: Some("codestral-key".into()),
    };
    cfg
}

// Deliberately odd spacing and key order: the relay must not re-serialize.
const WEATHER_BODY: &str = r#"{"data":{"timelines":[{"timestep":"1h","intervals":[{"startTime":"2024-05-01T10:00:00Z","values":{"temperature":14.2,  "precipitation":0}}]}]}}"#;

#[tokio::test]
async fn weather_forwards_fixed_params_and_relays_body_verbatim() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v4/timelines")
                .query_param("location", "London")
                .query_param("fields[]", "temperature")
                .query_param("fields[]", "precipitation")
                .query_param("timesteps[]", "1h")
                .query_param("units", "metric")
                .query_param("apikey", "tomorrow-key");
            then.status(200)
                .header("content-type", "application/json")
                .body(WEATHER_BODY);
        })
        .await;

    let (_, app) = app_with(cfg_for(&server), Arc::new(MemoryKpiStore::new()));
    let (status, body) = call_text(&app, get("/weather/London")).await;

    upstream.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, WEATHER_BODY);
}

#[tokio::test]
async fn weather_error_hides_api_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v4/timelines");
            then.status(401).json_body(json!({"code": 401001, "type": "Invalid Auth"}));
        })
        .await;

    let (state, app) = app_with(cfg_for(&server), Arc::new(MemoryKpiStore::new()));
    let (status, body) = call(&app, get("/weather/Paris")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("401"), "message={message}");
    assert!(!message.contains("tomorrow-key"), "message={message}");
    assert_eq!(state.metrics().upstream_errors.get(&[("upstream", "weather")]), 1);
}

#[tokio::test]
async fn huggingface_sends_inputs_with_bearer() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/mistralai/Codestral-22B-v0.1")
                .header("authorization", "Bearer hf-key")
                .json_body(json!({"inputs": "def fib(n):"}));
            then.status(200)
                .json_body(json!([{"generated_text": "def fib(n):\n    return n"}]));
        })
        .await;

    let (_, app) = app_with(cfg_for(&server), Arc::new(MemoryKpiStore::new()));
    let (status, body) = call(&app, post_json("/huggingface/completion", &json!({"prompt": "def fib(n):"}))).await;

    upstream.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"generated_text": "def fib(n):\n    return n"}]));
}

#[tokio::test]
async fn huggingface_forwards_array_prompt_unchanged() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/mistralai/Codestral-22B-v0.1")
                .json_body(json!({"inputs": ["def fib(n):", "fn main() {"]}));
            then.status(200).json_body(json!([[{"generated_text": "a"}], [{"generated_text": "b"}]]));
        })
        .await;

    let (_, app) = app_with(cfg_for(&server), Arc::new(MemoryKpiStore::new()));
    let prompt = json!({"prompt": ["def fib(n):", "fn main() {"]});
    let (status, body) = call(&app, post_json("/huggingface/completion", &prompt)).await;

    upstream.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1][0]["generated_text"], "b");
}

#[tokio::test]
async fn codestral_completion_caps_tokens() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/fim/completions")
                .header("authorization", "Bearer codestral-key")
                .json_body(json!({"prompt": "fn main() {", "max_tokens": 150}));
            then.status(200)
                .json_body(json!({"id": "cmpl-1", "choices": [{"message": {"content": "}"}}]}));
        })
        .await;

    let (_, app) = app_with(cfg_for(&server), Arc::new(MemoryKpiStore::new()));
    let (status, body) = call(&app, post_json("/codestral/completion", &json!({"prompt": "fn main() {"}))).await;

    upstream.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "cmpl-1");
}

#[tokio::test]
async fn codestral_chat_forwards_messages_unchanged() {
    let messages = json!([
        {"role": "system", "content": "be brief"},
        {"role": "user", "content": "hi", "name": "dash"}
    ]);

    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer codestral-key")
                .json_body(json!({"messages": messages.clone()}));
            then.status(200).json_body(json!({"object": "chat.completion"}));
        })
        .await;

    let (_, app) = app_with(cfg_for(&server), Arc::new(MemoryKpiStore::new()));
    let (status, body) = call(&app, post_json("/codestral/chat", &json!({"messages": messages}))).await;

    upstream.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"object": "chat.completion"}));
}

#[tokio::test]
async fn failing_upstreams_are_500_and_server_keeps_serving() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/mistralai/Codestral-22B-v0.1");
            then.status(503).body("model loading");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/fim/completions");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let mut cfg = cfg_for(&server);
    // Nothing listens on port 1.
    cfg.upstreams.codestral_chat_url = "http://127.0.0.1:1/v1/chat/completions".into();
    let (_, app) = app_with(cfg, Arc::new(MemoryKpiStore::new()));

    let cases = [
        post_json("/huggingface/completion", &json!({"prompt": "x"})),
        post_json("/codestral/completion", &json!({"prompt": "x"})),
        post_json("/codestral/chat", &json!({"messages": [{"role": "user", "content": "x"}]})),
    ];
    for req in cases {
        let uri = req.uri().to_string();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "uri={uri}");
        assert!(!body["message"].as_str().unwrap().is_empty(), "uri={uri}");
    }

    let (status, _) = call(&app, get("/kpis")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_credential_is_500() {
    let server = MockServer::start_async().await;
    let mut cfg = cfg_for(&server);
    cfg.credentials.codestral_api_key = None;
    let (_, app) = app_with(cfg, Arc::new(MemoryKpiStore::new()));

    let (status, body) = call(&app, post_json("/codestral/completion", &json!({"prompt": "x"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "CODESTRAL_API_KEY is not configured");
}

#[tokio::test]
async fn schema_mismatch_is_400_without_upstream_call() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).json_body(json!({}));
        })
        .await;

    let (_, app) = app_with(cfg_for(&server), Arc::new(MemoryKpiStore::new()));

    let (status, body) = call(&app, post_json("/codestral/chat", &json!({"messages": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["message"].as_str().unwrap().is_empty());

    let (status, _) = call(&app, post_raw("/huggingface/completion", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    upstream.assert_hits_async(0).await;
}
