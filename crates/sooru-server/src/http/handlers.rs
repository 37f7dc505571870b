use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sooru_api::openapi::openapi_v1_spec;
use sooru_api::{ApiError, ApiErrorCode};

use super::error::HandlerError;

pub(crate) async fn landing_handler() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to the Sooru floor-plan API",
        "version": env!("CARGO_PKG_VERSION"),
        "openapi": "/v1/openapi.json",
    }))
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_v1_spec())
}

pub(crate) async fn not_found_handler(uri: Uri) -> Response {
    HandlerError(ApiError::new(
        ApiErrorCode::NotFound,
        "route not found",
        json!({"path": uri.path()}),
        "req-unknown",
    ))
    .into_response()
}
