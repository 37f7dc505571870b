// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sooru_api::dto::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UserView};
use sooru_api::ApiError;
use sooru_model::{normalize_email, validate_password, Project, User};
use sooru_store::{RecordFilter, StoreExt};
use tracing::info;

use super::access::assigned;
use super::error::HandlerResult;
use super::extract::{ApiJson, Principal};
use crate::identity::{hash_password, verify_password};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "invalid email or password";

fn issue_token(state: &AppState, user: &User) -> HandlerResult<String> {
    let id = assigned(&user.id, "user")?;
    Ok(state.tokens.issue(id, state.now_secs())?)
}

pub(crate) async fn register_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> HandlerResult {
    validate_password(&req.password)?;
    let email = normalize_email(&req.email)?;
    let existing = state
        .store
        .list_of::<User>(&RecordFilter::with_email(&email))?;
    if !existing.is_empty() {
        return Err(ApiError::validation_failed("user already exists").into());
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .store
        .put(User::new(&req.name, &email, password_hash)?)?;
    let token = issue_token(&state, &user)?;
    info!(user_id = ?user.id, code = %user.code, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: Some("User registered successfully".to_string()),
            user: UserView::from(&user),
            token,
        }),
    )
        .into_response())
}

pub(crate) async fn login_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> HandlerResult {
    let Ok(email) = normalize_email(&req.email) else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS).into());
    };
    let user = state
        .store
        .list_of::<User>(&RecordFilter::with_email(&email))?
        .into_iter()
        .next();
    let Some(user) = user.filter(|u| verify_password(&req.password, &u.password_hash)) else {
        info!("login rejected");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS).into());
    };
    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        message: None,
        user: UserView::from(&user),
        token,
    })
    .into_response())
}

pub(crate) async fn profile_handler(
    State(state): State<AppState>,
    Principal(user_id): Principal,
) -> HandlerResult<Response> {
    let user = state.store.get::<User>(user_id.as_str())?;
    let projects = state
        .store
        .list_of::<Project>(&RecordFilter::owned_by(&user_id))?;
    Ok(Json(ProfileResponse {
        user: UserView::from(&user),
        projects,
    })
    .into_response())
}
