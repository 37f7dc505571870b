// SPDX-License-Identifier: Apache-2.0

//! Ownership-scoped loads. Records owned by someone else are reported as
//! missing so their existence does not leak.

use serde::Serialize;
use sooru_api::ApiError;
use sooru_core::UserId;
use sooru_model::{FloorPlan, Project};
use sooru_store::StoreExt;

use super::error::{HandlerError, HandlerResult};
use crate::AppState;

pub(crate) fn owned_project(
    state: &AppState,
    principal: &UserId,
    project_id: &str,
) -> HandlerResult<Project> {
    match state.store.find::<Project>(project_id)? {
        Some(project) if &project.owner == principal => Ok(project),
        _ => Err(ApiError::not_found("project", project_id).into()),
    }
}

pub(crate) fn owned_plan(
    state: &AppState,
    principal: &UserId,
    plan_id: &str,
) -> HandlerResult<FloorPlan> {
    match state.store.find::<FloorPlan>(plan_id)? {
        Some(plan) if &plan.created_by == principal => Ok(plan),
        _ => Err(ApiError::not_found("floor plan", plan_id).into()),
    }
}

/// A plan addressed through its project path must belong to that project.
pub(crate) fn owned_plan_in_project(
    state: &AppState,
    principal: &UserId,
    project_id: &str,
    plan_id: &str,
) -> HandlerResult<FloorPlan> {
    let plan = owned_plan(state, principal, plan_id)?;
    if plan.project_id.as_str() != project_id {
        return Err(ApiError::not_found("floor plan", plan_id).into());
    }
    Ok(plan)
}

/// Id the store assigned on save.
pub(crate) fn assigned<'a, T>(id: &'a Option<T>, what: &str) -> HandlerResult<&'a T> {
    id.as_ref().ok_or_else(|| {
        tracing::error!(record = what, "saved record has no id");
        HandlerError(ApiError::internal(format!("saved {what} has no id")))
    })
}

/// Fire-and-forget publication. Encoding failures are logged and dropped.
pub(crate) fn publish<T: Serialize>(state: &AppState, topic: &str, event: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => state.events.publish(topic, event, value),
        Err(err) => tracing::warn!(topic, event, error = %err, "event payload encoding failed"),
    }
}
