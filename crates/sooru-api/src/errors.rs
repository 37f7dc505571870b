// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sooru_core::ErrorCode;
use sooru_layout::LayoutError;
use sooru_model::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidQueryParameter,
    ValidationFailed,
    InvalidDimensions,
    InvalidRoomType,
    PlacementRejected,
    CapacityExceeded,
    Unauthorized,
    NotFound,
    Conflict,
    PayloadTooLarge,
    Internal,
}

pub const API_ERROR_CODES: [ApiErrorCode; 11] = [
    ApiErrorCode::InvalidQueryParameter,
    ApiErrorCode::ValidationFailed,
    ApiErrorCode::InvalidDimensions,
    ApiErrorCode::InvalidRoomType,
    ApiErrorCode::PlacementRejected,
    ApiErrorCode::CapacityExceeded,
    ApiErrorCode::Unauthorized,
    ApiErrorCode::NotFound,
    ApiErrorCode::Conflict,
    ApiErrorCode::PayloadTooLarge,
    ApiErrorCode::Internal,
];

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidQueryParameter => "InvalidQueryParameter",
            Self::ValidationFailed => "ValidationFailed",
            Self::InvalidDimensions => "InvalidDimensions",
            Self::InvalidRoomType => "InvalidRoomType",
            Self::PlacementRejected => "PlacementRejected",
            Self::CapacityExceeded => "CapacityExceeded",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "NotFound",
            Self::Conflict => "Conflict",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::Internal => "Internal",
        }
    }
}

impl From<ErrorCode> for ApiErrorCode {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::UsageError | ErrorCode::ValidationFailed => Self::ValidationFailed,
            ErrorCode::InvalidDimensions => Self::InvalidDimensions,
            ErrorCode::InvalidRoomType => Self::InvalidRoomType,
            ErrorCode::PlacementRejected => Self::PlacementRejected,
            ErrorCode::CapacityExceeded => Self::CapacityExceeded,
            ErrorCode::Unauthorized => Self::Unauthorized,
            ErrorCode::NotFound => Self::NotFound,
            ErrorCode::Conflict => Self::Conflict,
            ErrorCode::PayloadTooLarge => Self::PayloadTooLarge,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    /// Error without a request id yet; the server fills it in on the way out.
    #[must_use]
    pub fn bare(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn missing_param(name: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("missing query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "missing"}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::bare(ApiErrorCode::ValidationFailed, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::bare(ApiErrorCode::Unauthorized, message)
    }

    #[must_use]
    pub fn not_found(what: &str, id: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{what} not found"),
            json!({"resource": what, "id": id}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::bare(ApiErrorCode::Conflict, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::bare(ApiErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<LayoutError> for ApiError {
    fn from(value: LayoutError) -> Self {
        let details = match &value {
            LayoutError::CapacityExceeded { rooms_area, limit } => {
                json!({"rooms_area": rooms_area, "limit": limit})
            }
            LayoutError::InvalidRoomType(t) => json!({"type": t.as_str()}),
            _ => json!({}),
        };
        Self::new(value.code().into(), value.to_string(), details, "req-unknown")
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::validation_failed(value.0)
    }
}

impl From<sooru_core::Error> for ApiError {
    fn from(value: sooru_core::Error) -> Self {
        Self::validation_failed(value.to_string())
    }
}
