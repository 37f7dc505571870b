#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use sooru_core::ClockPort;
use sooru_store::{RecordStore, SystemClock};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
pub mod events;
mod http;
pub mod identity;
mod middleware;
mod runtime;

pub use config::{
    validate_startup_config_contract, ApiConfig, ServerConfig, StoreConfig, DEV_TOKEN_SECRET,
    MIN_TOKEN_SECRET_LEN,
};
pub use events::{BroadcastPublisher, EventEnvelope, EventPublisher, RecordingPublisher};
pub use identity::{AuthError, TokenSigner};
pub use runtime::{init_tracing, init_tracing_with, open_store, run, wait_for_shutdown_signal};

pub const CRATE_NAME: &str = "sooru-server";

/// Shared handler state. Every collaborator is injected; nothing is global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub events: Arc<dyn EventPublisher>,
    pub tokens: Arc<TokenSigner>,
    pub clock: Arc<dyn ClockPort>,
    pub api: ApiConfig,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        events: Arc<dyn EventPublisher>,
        tokens: TokenSigner,
    ) -> Self {
        Self::with_config(store, events, tokens, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn RecordStore>,
        events: Arc<dyn EventPublisher>,
        tokens: TokenSigner,
        api: ApiConfig,
    ) -> Self {
        Self {
            store,
            events,
            tokens: Arc::new(tokens),
            clock: Arc::new(SystemClock),
            api,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn ClockPort>) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn now_secs(&self) -> u64 {
        self.clock.now_unix_ms() / 1000
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/v1/openapi.json", get(http::handlers::openapi_handler))
        .route("/api/users/register", post(http::users::register_handler))
        .route("/api/users/login", post(http::users::login_handler))
        .route("/api/users/profile", get(http::users::profile_handler))
        .route(
            "/api/projects",
            post(http::projects::create_project_handler).get(http::projects::list_projects_handler),
        )
        .route(
            "/api/projects/:project_id",
            get(http::projects::get_project_handler)
                .put(http::projects::update_project_handler)
                .delete(http::projects::delete_project_handler),
        )
        .route(
            "/api/projects/:project_id/floorplans",
            get(http::floorplans::list_plans_handler),
        )
        .route(
            "/api/projects/:project_id/floorplans/generate",
            post(http::floorplans::generate_plan_handler),
        )
        .route(
            "/api/projects/:project_id/floorplans/:plan_id/rooms",
            post(http::rooms::add_room_handler),
        )
        .route(
            "/api/projects/:project_id/floorplans/:plan_id/rooms/measurements",
            get(http::rooms::measurements_handler),
        )
        .route(
            "/api/projects/:project_id/floorplans/:plan_id/rooms/validate",
            post(http::rooms::validate_room_handler),
        )
        .route(
            "/api/projects/:project_id/floorplans/:plan_id/rooms/:room_id",
            put(http::rooms::update_room_handler).delete(http::rooms::delete_room_handler),
        )
        .route(
            "/api/floorplans/suggestions",
            get(http::floorplans::suggestions_handler),
        )
        .route(
            "/api/floorplans/initialize",
            post(http::floorplans::initialize_plan_handler),
        )
        .route(
            "/api/floorplans/:plan_id",
            get(http::floorplans::get_plan_handler)
                .put(http::floorplans::update_plan_handler)
                .delete(http::floorplans::delete_plan_handler),
        )
        .route(
            "/api/floorplans/:plan_id/rooms/intake",
            post(http::floorplans::intake_handler),
        )
        .fallback(http::handlers::not_found_handler)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
