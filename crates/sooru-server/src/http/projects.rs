use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sooru_api::dto::{MessageResponse, ProjectRequest};
use sooru_model::{FloorPlan, Project};
use sooru_store::{RecordFilter, RecordKind, StoreExt};
use tracing::info;

use super::access::{assigned, owned_project, publish};
use super::error::HandlerResult;
use super::extract::{ApiJson, Principal};
use crate::events::{project_topic, user_topic};
use crate::AppState;

pub(crate) async fn create_project_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> HandlerResult {
    let project = state
        .store
        .put(Project::new(req.project_name, user_id.clone()))?;
    let project_id = assigned(&project.id, "project")?;
    info!(project_id = %project_id, code = %project.code, "project created");
    publish(
        &state,
        &user_topic(user_id.as_str()),
        "project-created",
        &project,
    );
    Ok((StatusCode::CREATED, Json(project)).into_response())
}

pub(crate) async fn list_projects_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
) -> HandlerResult {
    let projects = state
        .store
        .list_of::<Project>(&RecordFilter::owned_by(&user_id))?;
    Ok(Json(projects).into_response())
}

pub(crate) async fn get_project_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(project_id): Path<String>,
) -> HandlerResult {
    let project = owned_project(&state, &user_id, &project_id)?;
    Ok(Json(project).into_response())
}

pub(crate) async fn update_project_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> HandlerResult {
    let mut project = owned_project(&state, &user_id, &project_id)?;
    project.name = req.project_name.trim().to_string();
    let project = state.store.put(project)?;
    info!(project_id = %project_id, version = project.version, "project renamed");
    publish(
        &state,
        &user_topic(user_id.as_str()),
        "project-updated",
        &project,
    );
    Ok(Json(project).into_response())
}

/// Deletes the project and every floor plan filed under it.
pub(crate) async fn delete_project_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(project_id): Path<String>,
) -> HandlerResult<Response> {
    let project = owned_project(&state, &user_id, &project_id)?;
    let id = assigned(&project.id, "project")?;
    let plans = state
        .store
        .list_of::<FloorPlan>(&RecordFilter::owned_by(&user_id).in_project(id))?;
    for plan in &plans {
        if let Some(plan_id) = &plan.id {
            state.store.delete(RecordKind::FloorPlan, plan_id.as_str())?;
        }
    }
    state.store.delete(RecordKind::Project, id.as_str())?;
    info!(project_id = %id, plans = plans.len(), "project deleted");
    publish(
        &state,
        &user_topic(user_id.as_str()),
        "project-deleted",
        &json!({"project_id": id}),
    );
    publish(
        &state,
        &project_topic(id.as_str()),
        "project-deleted",
        &json!({"project_id": id}),
    );
    Ok(Json(MessageResponse::new("Project deleted successfully")).into_response())
}
