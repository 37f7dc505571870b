#![forbid(unsafe_code)]
//! Floor-plan domain model: rooms, plans, projects and users.
//!
//! Plan status changes go through [`PlanStatus::transition`]; any move outside
//! the lifecycle graph is a [`ValidationError`].
//!
//! ```
//! use sooru_model::PlanStatus;
//!
//! let next = PlanStatus::Draft.transition(PlanStatus::Generating).unwrap();
//! assert!(next.transition(PlanStatus::Draft).is_err());
//! ```

mod account;
mod plan;
mod room;
mod validation;

pub use account::{
    code_prefix, format_code, next_sequential_code, normalize_email, validate_name,
    validate_password, Project, User, CODE_PREFIX_LEN, PASSWORD_MIN_LEN,
};
pub use plan::{
    AdditionalRoom, AiSettings, FloorPlan, OptimizeFor, PlanStatus, Requirements, Style,
};
pub use room::{Dimensions, Position, Room, RoomType, ROOM_TYPES};
pub use validation::ValidationError;

pub const CRATE_NAME: &str = "sooru-model";
