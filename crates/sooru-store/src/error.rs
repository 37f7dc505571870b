use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Validation,
    Conflict,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Conflict => "conflict",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn io(err: impl Display) -> Self {
        Self::new(StoreErrorCode::Io, err.to_string())
    }

    pub(crate) fn poisoned() -> Self {
        Self::new(StoreErrorCode::Internal, "store lock poisoned")
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::io(value)
    }
}

impl From<sooru_core::ErrorContext<rusqlite::Error>> for StoreError {
    fn from(value: sooru_core::ErrorContext<rusqlite::Error>) -> Self {
        Self::io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::new(StoreErrorCode::Internal, format!("record encoding: {value}"))
    }
}

impl From<sooru_model::ValidationError> for StoreError {
    fn from(value: sooru_model::ValidationError) -> Self {
        Self::new(StoreErrorCode::Validation, value.0)
    }
}
