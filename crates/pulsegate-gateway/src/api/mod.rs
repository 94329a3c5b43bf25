//! HTTP handlers for the public routes and their error boundary.
//!
//! Every component returns `pulsegate_core::Result`; handlers wrap failures in
//! [`ApiError`], the one place an error kind becomes an HTTP status and a
//! `{"message": ...}` body.

pub mod kpis;
pub mod relay;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use pulsegate_core::error::{ClientCode, GatewayError};

/// Error response wrapper (`IntoResponse` for the core error type).
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        Self(e)
    }
}

/// Error kind to HTTP status. Input problems are 400, everything else 500.
pub fn status_for(code: ClientCode) -> StatusCode {
    if code.is_client_fault() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = status_for(code);
        tracing::warn!(code = code.as_str(), status = status.as_u16(), error = %self.0, "request failed");

        let body = Json(json!({ "message": self.0.message() }));
        (status, body).into_response()
    }
}

/// Unwrap a JSON body, turning axum's rejection into a 400 with its text.
pub fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(v)) => Ok(v),
        Err(rejection) => Err(ApiError(GatewayError::BadRequest(rejection.body_text()))),
    }
}
