#![forbid(unsafe_code)]

pub mod dto;
mod error_mapping;
mod errors;
pub mod openapi;
pub mod params;

pub use error_mapping::{map_error, ApiErrorMapping, API_ERROR_SCHEMA_REF};
pub use errors::{ApiError, ApiErrorCode, API_ERROR_CODES};

pub const CRATE_NAME: &str = "sooru-api";
