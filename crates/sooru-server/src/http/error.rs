// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sooru_api::{map_error, ApiError, ApiErrorCode};
use sooru_layout::LayoutError;
use sooru_model::ValidationError;
use sooru_store::{StoreError, StoreErrorCode};

use crate::identity::IdentityError;

/// Handler failure carrying the wire error. The request-tracing middleware
/// stamps the request id on it before the body leaves the server.
#[derive(Debug)]
pub(crate) struct HandlerError(pub ApiError);

pub(crate) type HandlerResult<T = Response> = Result<T, HandlerError>;

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(&err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(json!({"error": &err}))).into_response();
    response.extensions_mut().insert(err);
    response
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        api_error_response(self.0)
    }
}

impl From<ApiError> for HandlerError {
    fn from(value: ApiError) -> Self {
        Self(value)
    }
}

impl From<LayoutError> for HandlerError {
    fn from(value: LayoutError) -> Self {
        Self(value.into())
    }
}

impl From<ValidationError> for HandlerError {
    fn from(value: ValidationError) -> Self {
        Self(value.into())
    }
}

impl From<sooru_core::Error> for HandlerError {
    fn from(value: sooru_core::Error) -> Self {
        Self(value.into())
    }
}

impl From<StoreError> for HandlerError {
    fn from(value: StoreError) -> Self {
        let err = match value.code {
            StoreErrorCode::NotFound => ApiError::bare(ApiErrorCode::NotFound, value.message),
            StoreErrorCode::Validation => ApiError::validation_failed(value.message),
            StoreErrorCode::Conflict => ApiError::conflict(value.message),
            _ => {
                tracing::error!(code = value.code.as_str(), error = %value.message, "store failure");
                ApiError::internal("storage failure")
            }
        };
        Self(err)
    }
}

impl From<IdentityError> for HandlerError {
    fn from(value: IdentityError) -> Self {
        tracing::error!(error = %value, "identity failure");
        Self(ApiError::internal("identity failure"))
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(value: serde_json::Error) -> Self {
        tracing::error!(error = %value, "response encoding failed");
        Self(ApiError::internal("response encoding failed"))
    }
}
