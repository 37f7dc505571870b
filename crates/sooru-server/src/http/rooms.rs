use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sooru_api::dto::{
    AddRoomRequest, MessageResponse, UpdateRoomRequest, ValidateRoomRequest, ValidateRoomResponse,
};
use sooru_api::ApiError;
use sooru_layout::{check_placement, check_room_update, compute_measurements, LayoutError};
use sooru_model::{validate_name, FloorPlan, Room};
use sooru_store::StoreExt;
use tracing::info;

use super::access::{owned_plan_in_project, publish};
use super::error::HandlerResult;
use super::extract::{ApiJson, Principal};
use crate::events::{floorplan_topic, project_topic};
use crate::AppState;

/// Save the edited plan and announce `event` on the project topic plus
/// `floorplan-updated` on the plan topic. A concurrent writer surfaces as 409.
fn commit_room_change(
    state: &AppState,
    plan: FloorPlan,
    plan_id: &str,
    event: &str,
    payload: serde_json::Value,
) -> HandlerResult<FloorPlan> {
    let plan = state.store.put(plan)?;
    publish(state, &project_topic(plan.project_id.as_str()), event, &payload);
    publish(state, &floorplan_topic(plan_id), "floorplan-updated", &plan);
    Ok(plan)
}

fn room_not_found(room_id: &str) -> ApiError {
    ApiError::not_found("room", room_id)
}

pub(crate) async fn add_room_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path((project_id, plan_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<AddRoomRequest>,
) -> HandlerResult {
    let mut plan = owned_plan_in_project(&state, &user_id, &project_id, &plan_id)?;
    validate_name("room name", &req.name)?;
    req.position.validate()?;
    check_placement(&plan.dimensions, &plan.rooms, &req.dimensions, &req.position)?;

    let room = Room::new(
        plan.next_room_id(),
        req.name.trim(),
        req.room_type,
        req.dimensions,
        req.position,
    );
    plan.rooms.push(room.clone());
    let payload = json!({"floor_plan_id": plan_id, "room": &room});
    let plan = commit_room_change(&state, plan, &plan_id, "room-added", payload)?;
    info!(
        plan_id = %plan_id,
        room_id = %room.id,
        version = plan.version,
        "room added"
    );
    Ok((StatusCode::CREATED, Json(room)).into_response())
}

pub(crate) async fn update_room_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path((project_id, plan_id, room_id)): Path<(String, String, String)>,
    ApiJson(req): ApiJson<UpdateRoomRequest>,
) -> HandlerResult {
    let mut plan = owned_plan_in_project(&state, &user_id, &project_id, &plan_id)?;
    let Some(index) = plan.rooms.iter().position(|r| r.id.as_str() == room_id) else {
        return Err(room_not_found(&room_id).into());
    };

    let mut room = plan.rooms[index].clone();
    if let Some(name) = req.name {
        room.name = name.trim().to_string();
    }
    if let Some(room_type) = req.room_type {
        room.room_type = room_type;
    }
    if let Some(dimensions) = req.dimensions {
        room.dimensions = dimensions;
    }
    if let Some(position) = req.position {
        room.position = position;
    }
    room.validate()?;
    check_room_update(&plan.dimensions, &plan.rooms, &room)?;

    plan.rooms[index] = room.clone();
    let payload = json!({"floor_plan_id": plan_id, "room": &room});
    commit_room_change(&state, plan, &plan_id, "room-updated", payload)?;
    info!(plan_id = %plan_id, room_id = %room.id, "room updated");
    Ok(Json(room).into_response())
}

pub(crate) async fn delete_room_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path((project_id, plan_id, room_id)): Path<(String, String, String)>,
) -> HandlerResult<Response> {
    let mut plan = owned_plan_in_project(&state, &user_id, &project_id, &plan_id)?;
    let before = plan.rooms.len();
    plan.rooms.retain(|r| r.id.as_str() != room_id);
    if plan.rooms.len() == before {
        return Err(room_not_found(&room_id).into());
    }
    let payload = json!({"floor_plan_id": plan_id, "room_id": room_id});
    commit_room_change(&state, plan, &plan_id, "room-deleted", payload)?;
    info!(plan_id = %plan_id, room_id = %room_id, "room deleted");
    Ok(Json(MessageResponse::new("Room deleted successfully")).into_response())
}

pub(crate) async fn measurements_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path((project_id, plan_id)): Path<(String, String)>,
) -> HandlerResult {
    let plan = owned_plan_in_project(&state, &user_id, &project_id, &plan_id)?;
    Ok(Json(compute_measurements(&plan.dimensions, &plan.rooms)).into_response())
}

/// Dry-run placement check. Malformed dimensions are a 400; a geometric
/// rejection is `{valid: false}`. With `room_id`, that room's current
/// rectangle is ignored so an edit can be checked before it is sent.
pub(crate) async fn validate_room_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path((project_id, plan_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<ValidateRoomRequest>,
) -> HandlerResult {
    let plan = owned_plan_in_project(&state, &user_id, &project_id, &plan_id)?;
    let siblings: Vec<Room> = match &req.room_id {
        Some(id) => plan.rooms.iter().filter(|r| &r.id != id).cloned().collect(),
        None => plan.rooms.clone(),
    };
    let valid = match check_placement(&plan.dimensions, &siblings, &req.dimensions, &req.position)
    {
        Ok(()) => true,
        Err(LayoutError::PlacementRejected) => false,
        Err(other) => return Err(other.into()),
    };
    Ok(Json(ValidateRoomResponse { valid }).into_response())
}
