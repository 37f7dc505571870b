// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use sooru_core::RoomId;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::ValidationError;

/// Width and length of a plot or room, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: f64, length: f64) -> Self {
        Self { width, length }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.length
    }

    /// Both sides finite and strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.length.is_finite() && self.width > 0.0 && self.length > 0.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_positive() {
            return Err(ValidationError(format!(
                "dimensions must be positive finite numbers, got {}x{}",
                self.width, self.length
            )));
        }
        Ok(())
    }
}

/// Top-left corner of a room in plot-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.x.is_finite() || !self.y.is_finite() || self.x < 0.0 || self.y < 0.0 {
            return Err(ValidationError(format!(
                "position must be non-negative, got ({}, {})",
                self.x, self.y
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Bedroom,
    Bathroom,
    Kitchen,
    Living,
    Dining,
    Study,
    Other,
}

pub const ROOM_TYPES: [RoomType; 7] = [
    RoomType::Bedroom,
    RoomType::Bathroom,
    RoomType::Kitchen,
    RoomType::Living,
    RoomType::Dining,
    RoomType::Study,
    RoomType::Other,
];

impl RoomType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bedroom => "bedroom",
            Self::Bathroom => "bathroom",
            Self::Kitchen => "kitchen",
            Self::Living => "living",
            Self::Dining => "dining",
            Self::Study => "study",
            Self::Other => "other",
        }
    }
}

impl Display for RoomType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ROOM_TYPES
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| ValidationError(format!("unknown room type `{s}`")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub dimensions: Dimensions,
    pub position: Position,
    #[serde(default)]
    pub ai_generated: bool,
}

impl Room {
    #[must_use]
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        room_type: RoomType,
        dimensions: Dimensions,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            room_type,
            dimensions,
            position,
            ai_generated: false,
        }
    }

    #[must_use]
    pub fn generated(mut self) -> Self {
        self.ai_generated = true;
        self
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.dimensions.area()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("room name must not be empty".to_string()));
        }
        self.dimensions.validate()?;
        self.position.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_type_parses_case_insensitively() {
        assert_eq!("Kitchen".parse::<RoomType>(), Ok(RoomType::Kitchen));
        assert_eq!(" living ".parse::<RoomType>(), Ok(RoomType::Living));
        assert!("garage".parse::<RoomType>().is_err());
    }

    #[test]
    fn zero_or_nan_dimensions_are_not_positive() {
        assert!(!Dimensions::new(0.0, 4.0).is_positive());
        assert!(!Dimensions::new(4.0, -1.0).is_positive());
        assert!(!Dimensions::new(f64::NAN, 4.0).is_positive());
        assert!(Dimensions::new(0.5, 4.0).is_positive());
    }
}
