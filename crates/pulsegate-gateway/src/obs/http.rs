use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Count, time, and gauge every request on a matched route.
///
/// Installed with `route_layer`, so `MatchedPath` is always present and the
/// `route` label stays bounded to the route table.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().as_str().to_owned();

    let metrics = state.metrics();
    metrics.http_in_flight.inc(&[("route", route.as_str())]);
    let started = Instant::now();

    let resp = next.run(req).await;

    let elapsed = started.elapsed();
    metrics.http_in_flight.dec(&[("route", route.as_str())]);
    metrics.http_duration.observe(&[("route", route.as_str())], elapsed);
    metrics.http_requests.inc(&[
        ("method", method.as_str()),
        ("route", route.as_str()),
        ("status", resp.status().as_str()),
    ]);

    tracing::debug!(%method, %route, status = %resp.status(), elapsed_ms = elapsed.as_millis() as u64, "request");
    resp
}
