// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

pub const ID_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FloorPlanId(String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

fn validate_id(kind: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidIdentifier {
            kind,
            value: value.to_owned(),
            reason: "must not be empty",
        });
    }

    if value.len() > ID_MAX_LEN {
        return Err(Error::InvalidIdentifier {
            kind,
            value: value.to_owned(),
            reason: "must be at most 64 characters",
        });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(Error::InvalidIdentifier {
            kind,
            value: value.to_owned(),
            reason: "must contain only [a-z0-9_-]",
        });
    }

    Ok(())
}

macro_rules! impl_id_traits {
    ($name:ident, $kind:literal) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                validate_id($kind, &value)?;
                Ok(Self(value))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = Error;

            fn try_from(value: &str) -> Result<Self> {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }
    };
}

impl_id_traits!(UserId, "user_id");
impl_id_traits!(ProjectId, "project_id");
impl_id_traits!(FloorPlanId, "floorplan_id");
impl_id_traits!(RoomId, "room_id");

impl RoomId {
    /// Room ids inside a plan are `r{n}` with `n` taken from the plan's room sequence.
    #[must_use]
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("r{seq}"))
    }
}
