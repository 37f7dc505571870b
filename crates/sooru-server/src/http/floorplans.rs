// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, Query, State};
use axum::http::header::{ETAG, IF_NONE_MATCH};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sooru_api::dto::{
    GenerateRequest, InitializeRequest, InitializeResponse, IntakeRequest, IntakeResponse,
    MessageResponse, SuggestionsResponse, UpdatePlanRequest,
};
use sooru_api::params::parse_plot_params;
use sooru_core::canonical::entity_tag;
use sooru_layout::{
    generate_layout, process_room_intake, suggest_dimensions, validate_plot_dimensions,
    validate_room_set, LayoutError,
};
use sooru_model::{FloorPlan, PlanStatus};
use sooru_store::{RecordFilter, RecordKind, StoreExt};
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::access::{assigned, owned_plan, owned_project, publish};
use super::error::HandlerResult;
use super::extract::{ApiJson, Principal};
use crate::events::{floorplan_topic, project_topic};
use crate::AppState;

pub(crate) async fn suggestions_handler(
    Query(query): Query<BTreeMap<String, String>>,
) -> HandlerResult {
    let (width, length) = parse_plot_params(&query)?;
    let plot = validate_plot_dimensions(width, length)?;
    Ok(Json(SuggestionsResponse {
        plot,
        suggestions: suggest_dimensions(width, length),
    })
    .into_response())
}

pub(crate) async fn initialize_plan_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    ApiJson(req): ApiJson<InitializeRequest>,
) -> HandlerResult {
    let plot = validate_plot_dimensions(req.plot_width, req.plot_length)?;
    let project = owned_project(&state, &user_id, req.project_id.as_str())?;
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("{} floor plan", project.name));

    let plan = state
        .store
        .put(FloorPlan::draft(name, req.project_id.clone(), plot, user_id))?;
    let plan_id = assigned(&plan.id, "floor plan")?;
    info!(plan_id = %plan_id, project_id = %plan.project_id, "floor plan initialized");
    publish(
        &state,
        &project_topic(plan.project_id.as_str()),
        "floorplan-created",
        &plan,
    );

    Ok((
        StatusCode::CREATED,
        Json(InitializeResponse {
            floor_plan: plan,
            suggestions: suggest_dimensions(req.plot_width, req.plot_length),
        }),
    )
        .into_response())
}

pub(crate) async fn intake_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(plan_id): Path<String>,
    ApiJson(req): ApiJson<IntakeRequest>,
) -> HandlerResult {
    let mut plan = owned_plan(&state, &user_id, &plan_id)?;
    let intake = process_room_intake(plan.dimensions.width, plan.dimensions.length, &req.rooms)?;
    plan.requirements = intake.requirements.clone();
    let plan = run_generation(&state, plan)?;
    Ok(Json(IntakeResponse {
        floor_plan: plan,
        intake,
    })
    .into_response())
}

pub(crate) async fn generate_plan_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> HandlerResult {
    let project = owned_project(&state, &user_id, &project_id)?;
    if !req.dimensions.is_positive() {
        return Err(LayoutError::InvalidDimensions(format!(
            "plot must have positive width and length, got {}x{}",
            req.dimensions.width, req.dimensions.length
        ))
        .into());
    }
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("{} floor plan", project.name));
    let project_id = assigned(&project.id, "project")?.clone();

    let mut plan = FloorPlan::draft(name, project_id, req.dimensions, user_id);
    plan.requirements = req.requirements;
    plan.ai_settings = req.ai_settings;
    let plan = run_generation(&state, plan)?;
    Ok((StatusCode::CREATED, Json(plan)).into_response())
}

/// Persist the plan as `generating`, lay it out, then persist the outcome.
///
/// A layout that does not fit its plot is logged. With
/// `enforce_generated_fit` it also marks the plan `failed` and surfaces
/// `PlacementRejected`.
fn run_generation(state: &AppState, mut plan: FloorPlan) -> HandlerResult<FloorPlan> {
    plan.set_status(PlanStatus::Generating)?;
    let mut plan = state.store.put(plan)?;
    let plan_id = assigned(&plan.id, "floor plan")?.clone();

    let layout = generate_layout(&plan.requirements, &plan.dimensions, &plan.ai_settings);
    plan.replace_rooms(layout.rooms);
    plan.generated_layout = Some(layout.layout_svg);

    let rejected = match validate_room_set(&plan.dimensions, &plan.rooms) {
        Ok(()) => false,
        Err(err) => {
            warn!(
                plan_id = %plan_id,
                error = %err,
                enforced = state.api.enforce_generated_fit,
                "generated layout does not fit the plot"
            );
            state.api.enforce_generated_fit
        }
    };
    plan.set_status(if rejected {
        PlanStatus::Failed
    } else {
        PlanStatus::Completed
    })?;

    let plan = match state.store.put(plan) {
        Ok(plan) => plan,
        Err(err) => {
            mark_generation_failed(state, plan_id.as_str());
            return Err(err.into());
        }
    };
    info!(
        plan_id = %plan_id,
        rooms = plan.rooms.len(),
        status = plan.status.as_str(),
        "floor plan generated"
    );
    publish(state, &floorplan_topic(plan_id.as_str()), "floorplan-updated", &plan);

    if rejected {
        return Err(LayoutError::PlacementRejected.into());
    }
    Ok(plan)
}

// The outcome could not be stored; move the stored copy off `generating`
// so the plan does not keep advertising a run that no longer exists.
fn mark_generation_failed(state: &AppState, plan_id: &str) {
    let current = match state.store.find::<FloorPlan>(plan_id) {
        Ok(Some(plan)) if plan.status == PlanStatus::Generating => plan,
        Ok(_) => return,
        Err(err) => {
            warn!(plan_id, error = %err, "could not reload plan after failed generation save");
            return;
        }
    };
    let mut failed = current;
    if failed.set_status(PlanStatus::Failed).is_err() {
        return;
    }
    match state.store.put(failed) {
        Ok(_) => warn!(plan_id, "generation result was not saved; plan marked failed"),
        Err(err) => warn!(plan_id, error = %err, "could not mark plan failed"),
    }
}

pub(crate) async fn list_plans_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(project_id): Path<String>,
) -> HandlerResult {
    let project = owned_project(&state, &user_id, &project_id)?;
    let id = assigned(&project.id, "project")?;
    let plans = state
        .store
        .list_of::<FloorPlan>(&RecordFilter::owned_by(&user_id).in_project(id))?;
    Ok(Json(plans).into_response())
}

pub(crate) async fn get_plan_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(plan_id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult {
    let plan = owned_plan(&state, &user_id, &plan_id)?;
    let etag = entity_tag(&plan)?;
    let matched = headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|candidate| candidate.trim() == etag));

    let mut response = if matched {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        Json(plan).into_response()
    };
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(ETAG, value);
    }
    Ok(response)
}

pub(crate) async fn update_plan_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(plan_id): Path<String>,
    ApiJson(req): ApiJson<UpdatePlanRequest>,
) -> HandlerResult {
    let mut plan = owned_plan(&state, &user_id, &plan_id)?;
    if let Some(name) = req.name {
        plan.name = name.trim().to_string();
    }
    if let Some(requirements) = req.requirements {
        plan.requirements = requirements;
    }
    if let Some(settings) = req.ai_settings {
        plan.ai_settings = settings;
    }
    let plan = state.store.put(plan)?;
    info!(plan_id = %plan_id, version = plan.version, "floor plan updated");
    publish(&state, &floorplan_topic(&plan_id), "floorplan-updated", &plan);
    Ok(Json(plan).into_response())
}

pub(crate) async fn delete_plan_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(plan_id): Path<String>,
) -> HandlerResult<Response> {
    let plan = owned_plan(&state, &user_id, &plan_id)?;
    state.store.delete(RecordKind::FloorPlan, &plan_id)?;
    info!(plan_id = %plan_id, "floor plan deleted");
    let payload = json!({"floor_plan_id": plan_id, "project_id": plan.project_id});
    publish(
        &state,
        &project_topic(plan.project_id.as_str()),
        "floorplan-deleted",
        &payload,
    );
    publish(&state, &floorplan_topic(&plan_id), "floorplan-deleted", &payload);
    Ok(Json(MessageResponse::new("Floor plan deleted successfully")).into_response())
}
