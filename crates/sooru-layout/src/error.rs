// SPDX-License-Identifier: Apache-2.0

use sooru_core::ErrorCode;
use sooru_model::RoomType;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LayoutError {
    InvalidDimensions(String),
    InvalidRoomType(RoomType),
    PlacementRejected,
    CapacityExceeded { rooms_area: f64, limit: f64 },
}

impl LayoutError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidDimensions(_) => ErrorCode::InvalidDimensions,
            Self::InvalidRoomType(_) => ErrorCode::InvalidRoomType,
            Self::PlacementRejected => ErrorCode::PlacementRejected,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
        }
    }
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions(msg) => write!(f, "invalid dimensions: {msg}"),
            Self::InvalidRoomType(t) => write!(f, "invalid room type: {t}"),
            Self::PlacementRejected => f.write_str("room placement rejected"),
            Self::CapacityExceeded { rooms_area, limit } => write!(
                f,
                "total room area {rooms_area} exceeds usable plot area {limit}"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}
