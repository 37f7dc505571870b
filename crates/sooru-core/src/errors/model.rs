use std::collections::BTreeMap;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Stable machine-readable error codes shared by the API and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    UsageError,
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

pub const ERROR_CODES: &[ErrorCode] = &[
    ErrorCode::UsageError,
    ErrorCode::ValidationFailed,
    ErrorCode::InvalidDimensions,
    ErrorCode::InvalidRoomType,
    ErrorCode::PlacementRejected,
    ErrorCode::CapacityExceeded,
    ErrorCode::Unauthorized,
    ErrorCode::NotFound,
    ErrorCode::Conflict,
    ErrorCode::PayloadTooLarge,
    ErrorCode::Internal,
];

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UsageError => "UsageError",
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

    /// Process exit code a CLI should use when failing with this code.
    #[must_use]
    pub const fn exit_code(self) -> ExitCode {
        match self {
            Self::UsageError => ExitCode::Usage,
            Self::ValidationFailed
            | Self::InvalidDimensions
            | Self::InvalidRoomType
            | Self::PlacementRejected
            | Self::CapacityExceeded => ExitCode::Validation,
            Self::Unauthorized | Self::NotFound | Self::Conflict | Self::PayloadTooLarge => {
                ExitCode::DependencyFailure
            }
            Self::Internal => ExitCode::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    DependencyFailure = 4,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Usage => "usage",
            Self::Validation => "validation",
            Self::DependencyFailure => "dependency_failure",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    SerdeJson(serde_json::Error),
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerdeJson(err) => write!(f, "serde json error: {err}"),
            Self::InvalidIdentifier {
                kind,
                value,
                reason,
            } => write!(f, "invalid {kind} `{value}`: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerdeJson(err) => Some(err),
            Self::InvalidIdentifier { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::SerdeJson(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl MachineError {
    #[must_use]
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn from_code(code: ErrorCode, message: &str) -> Self {
        Self::new(code.as_str(), message)
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for MachineError {}
