#![forbid(unsafe_code)]
//! Geometry, placement validation and layout generation for floor plans.
//!
//! Everything here is synchronous and side-effect free. Callers load a plan,
//! hand plain values to these functions and persist whatever comes back.

mod error;
mod geometry;
mod intake;
mod measure;
mod planner;
mod render;
mod suggest;
mod validator;

pub use error::LayoutError;
pub use geometry::{contains_rect, rectangles_overlap, Rect};
pub use intake::{process_room_intake, Intake, IntakeRoom, RoomRequest, CAPACITY_RATIO};
pub use measure::{compute_measurements, Measurements};
pub use planner::{
    generate_layout, GeneratedLayout, BATHROOM_SIZE, BEDROOM_SIZE, KITCHEN_SIZE, LIVING_SIZE,
};
pub use render::{render_svg, SVG_SCALE};
pub use suggest::{
    reference_dimensions, suggest_dimensions, validate_plot_dimensions, RoomSuggestion,
    PLOT_MAX_FT, PLOT_MIN_FT, REFERENCE_PLOT_AREA, SUGGESTED_ROOM_TYPES,
};
pub use validator::{check_placement, check_room_update, validate_placement, validate_room_set};

pub const CRATE_NAME: &str = "sooru-layout";
