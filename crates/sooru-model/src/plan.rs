use serde::{Deserialize, Serialize};
use sooru_core::{FloorPlanId, ProjectId, RoomId, UserId};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::{Dimensions, Room, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum AdditionalRoom {
    Study,
    Office,
    Playroom,
    Gym,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Requirements {
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default = "default_true")]
    pub has_kitchen: bool,
    #[serde(default = "default_true")]
    pub has_living_room: bool,
    #[serde(default)]
    pub has_dining_room: bool,
    #[serde(default)]
    pub additional_rooms: BTreeSet<AdditionalRoom>,
}

fn default_true() -> bool {
    true
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            bedrooms: 0,
            bathrooms: 0,
            has_kitchen: true,
            has_living_room: true,
            has_dining_room: false,
            additional_rooms: BTreeSet::new(),
        }
    }
}

impl Requirements {
    #[must_use]
    pub fn new(bedrooms: u32, bathrooms: u32) -> Self {
        Self {
            bedrooms,
            bathrooms,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Style {
    Modern,
    Traditional,
    Minimalist,
    #[default]
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OptimizeFor {
    #[default]
    Space,
    NaturalLight,
    Accessibility,
    EnergyEfficiency,
}

/// Generation hints. Carried on the plan; the placeholder planner ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiSettings {
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub optimize_for: OptimizeFor,
    #[serde(default)]
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Draft,
    Generating,
    Completed,
    Failed,
}

impl PlanStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Generating)
                | (Self::Generating, Self::Generating)
                | (Self::Generating, Self::Completed)
                | (Self::Generating, Self::Failed)
                | (Self::Completed, Self::Generating)
                | (Self::Failed, Self::Generating)
        )
    }

    pub fn transition(self, next: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ValidationError(format!(
                "floor plan status cannot move from {self} to {next}"
            )))
        }
    }
}

impl Display for PlanStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FloorPlanId>,
    pub name: String,
    pub project_id: ProjectId,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub ai_settings: AiSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_layout: Option<String>,
    #[serde(default)]
    pub status: PlanStatus,
    pub created_by: UserId,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub room_seq: u64,
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default)]
    pub updated_at_ms: u64,
}

impl FloorPlan {
    /// Unsaved draft. The store assigns id, timestamps and version on first save.
    #[must_use]
    pub fn draft(
        name: impl Into<String>,
        project_id: ProjectId,
        dimensions: Dimensions,
        created_by: UserId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            project_id,
            dimensions,
            rooms: Vec::new(),
            requirements: Requirements::default(),
            ai_settings: AiSettings::default(),
            generated_layout: None,
            status: PlanStatus::Draft,
            created_by,
            version: 0,
            room_seq: 0,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    /// Reserve the next room id from the plan's monotonic sequence.
    pub fn next_room_id(&mut self) -> RoomId {
        self.room_seq += 1;
        RoomId::from_seq(self.room_seq)
    }

    /// Replace the whole room set, e.g. after generation. Every adopted room
    /// gets a fresh id from the plan's sequence, so ids issued before are
    /// never handed out again.
    pub fn replace_rooms(&mut self, rooms: Vec<Room>) {
        let mut adopted = Vec::with_capacity(rooms.len());
        for mut room in rooms {
            room.id = self.next_room_id();
            adopted.push(room);
        }
        self.rooms = adopted;
    }

    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn set_status(&mut self, next: PlanStatus) -> Result<(), ValidationError> {
        self.status = self.status.transition(next)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("floor plan name must not be empty".to_string()));
        }
        self.dimensions.validate()?;
        let mut seen = BTreeSet::new();
        for room in &self.rooms {
            room.validate()?;
            if !seen.insert(room.id.as_str()) {
                return Err(ValidationError(format!("duplicate room id `{}`", room.id)));
            }
        }
        Ok(())
    }
}
