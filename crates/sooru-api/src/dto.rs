//! Request and response bodies. Field names are snake_case on the wire.

use serde::{Deserialize, Serialize};
use sooru_core::{ProjectId, RoomId, UserId};
use sooru_layout::{Intake, Measurements, RoomRequest, RoomSuggestion};
use sooru_model::{
    AiSettings, Dimensions, FloorPlan, Position, Project, Requirements, RoomType, User,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user as shown to clients: never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Option<UserId>,
    pub code: String,
    pub name: String,
    pub email: String,
    pub created_at_ms: u64,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            code: user.code.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at_ms: user.created_at_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserView,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectRequest {
    pub project_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Suggestions = BTreeMap<RoomType, RoomSuggestion>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionsResponse {
    pub plot: Dimensions,
    pub suggestions: Suggestions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitializeRequest {
    pub plot_width: f64,
    pub plot_length: f64,
    pub project_id: ProjectId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitializeResponse {
    pub floor_plan: FloorPlan,
    pub suggestions: Suggestions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntakeRequest {
    pub rooms: Vec<RoomRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeResponse {
    pub floor_plan: FloorPlan,
    pub intake: Intake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub requirements: Requirements,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub ai_settings: AiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub ai_settings: Option<AiSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddRoomRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub dimensions: Dimensions,
    pub position: Position,
}

/// Merge patch for a room: absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoomRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Candidate placement. With `room_id` set the candidate is treated as a move of that
/// room, so its current rectangle is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateRoomRequest {
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub room_type: Option<RoomType>,
    pub dimensions: Dimensions,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRoomResponse {
    pub valid: bool,
}

pub type MeasurementsResponse = Measurements;
