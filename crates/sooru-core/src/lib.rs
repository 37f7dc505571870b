#![forbid(unsafe_code)]
//! Shared error model, identifiers and canonical hashing for the sooru workspace.

pub mod canonical;
mod errors;
mod ports;
mod types;

pub use canonical::sha256_hex;
pub use errors::{
    Error, ErrorCode, ErrorContext, ExitCode, MachineError, Result, ResultExt, ERROR_CODES,
};
pub use ports::ClockPort;
pub use types::ids::{FloorPlanId, ProjectId, RoomId, UserId, ID_MAX_LEN};

pub const CRATE_NAME: &str = "sooru-core";

pub const ENV_SOORU_LOG_JSON: &str = "SOORU_LOG_JSON";
pub const ENV_SOORU_TOKEN_SECRET: &str = "SOORU_TOKEN_SECRET";
