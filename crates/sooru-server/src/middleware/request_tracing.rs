// SPDX-License-Identifier: Apache-2.0

use crate::http::error::api_error_response;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use sooru_api::ApiError;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::Instrument;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Echo a caller-supplied `x-request-id` or mint `req-{n:016x}`.
#[must_use]
pub(crate) fn request_id_for(headers: &HeaderMap, state: &AppState) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
            format!("req-{id:016x}")
        })
}

pub(crate) async fn request_tracing_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let request_id = request_id_for(request.headers(), &state);

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %method,
        route = %route,
    );
    let started = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;
    if let Some(err) = response.extensions_mut().remove::<ApiError>() {
        response = api_error_response(err.with_request_id(request_id.clone()));
    }
    let status = response.status().as_u16();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    span.in_scope(|| {
        if status >= 500 {
            tracing::error!(status, elapsed_ms, "request failed");
        } else {
            tracing::info!(status, elapsed_ms, "request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
