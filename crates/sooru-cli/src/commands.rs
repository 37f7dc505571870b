// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::json;
use sooru_layout::{
    compute_measurements, generate_layout, suggest_dimensions, validate_plot_dimensions,
    validate_room_set, LayoutError,
};
use sooru_model::{AiSettings, Dimensions, Requirements, Room};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{CliError, OutputMode};

/// The subset of a floor plan the offline commands read. A full plan as
/// returned by `GET /api/floorplans/:id` is accepted; other fields are ignored.
#[derive(Debug, Deserialize)]
struct PlanFile {
    dimensions: Dimensions,
    #[serde(default)]
    rooms: Vec<Room>,
}

pub(crate) struct GenerateArgs {
    pub(crate) width: f64,
    pub(crate) length: f64,
    pub(crate) bedrooms: u32,
    pub(crate) bathrooms: u32,
    pub(crate) kitchen: bool,
    pub(crate) living_room: bool,
    pub(crate) require_fit: bool,
    pub(crate) svg_out: Option<PathBuf>,
}

pub(crate) fn emit_ok<T: Serialize + ?Sized>(output_mode: OutputMode, payload: &T) -> Result<(), String> {
    if output_mode.quiet {
        return Ok(());
    }
    let rendered = if output_mode.json {
        serde_json::to_string(payload)
    } else {
        serde_json::to_string_pretty(payload)
    };
    println!("{}", rendered.map_err(|e| e.to_string())?);
    Ok(())
}

pub(crate) fn suggest(width: f64, length: f64, output_mode: OutputMode) -> Result<(), CliError> {
    let plot = validate_plot_dimensions(width, length)?;
    let suggestions = suggest_dimensions(plot.width, plot.length);
    emit_ok(
        output_mode,
        &json!({
            "plot": plot,
            "suggestions": suggestions,
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn generate(args: GenerateArgs, output_mode: OutputMode) -> Result<(), CliError> {
    let plot = Dimensions::new(args.width, args.length);
    if !plot.is_positive() {
        return Err(LayoutError::InvalidDimensions(format!(
            "plot must have positive width and length, got {}x{}",
            args.width, args.length
        ))
        .into());
    }
    let requirements = Requirements {
        has_kitchen: args.kitchen,
        has_living_room: args.living_room,
        ..Requirements::new(args.bedrooms, args.bathrooms)
    };
    let layout = generate_layout(&requirements, &plot, &AiSettings::default());
    let fit = validate_room_set(&plot, &layout.rooms);
    debug!(rooms = layout.rooms.len(), fits = fit.is_ok(), "layout generated");
    if args.require_fit {
        fit.clone()?;
    }

    if let Some(path) = &args.svg_out {
        fs::write(path, &layout.layout_svg)
            .map_err(|e| CliError::internal(format!("failed to write {}: {e}", path.display())))?;
    }

    emit_ok(
        output_mode,
        &json!({
            "dimensions": plot,
            "requirements": requirements,
            "rooms": layout.rooms,
            "fits": fit.is_ok(),
            "svg_out": args.svg_out.as_ref().map(|p| p.display().to_string()),
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn validate(path: &Path, output_mode: OutputMode) -> Result<(), CliError> {
    let plan = read_plan(path)?;
    validate_room_set(&plan.dimensions, &plan.rooms)?;
    emit_ok(
        output_mode,
        &json!({"valid": true, "rooms": plan.rooms.len()}),
    )
    .map_err(CliError::internal)
}

pub(crate) fn measure(path: &Path, output_mode: OutputMode) -> Result<(), CliError> {
    let plan = read_plan(path)?;
    emit_ok(output_mode, &compute_measurements(&plan.dimensions, &plan.rooms))
        .map_err(CliError::internal)
}

fn read_plan(path: &Path) -> Result<PlanFile, CliError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::input(path, format!("failed to read plan file: {e}")))?;
    let plan: PlanFile = serde_json::from_str(&raw)
        .map_err(|e| CliError::input(path, format!("plan file is not a valid plan: {e}")))?;
    if !plan.dimensions.is_positive() {
        return Err(LayoutError::InvalidDimensions(format!(
            "plot must have positive width and length, got {}x{}",
            plan.dimensions.width, plan.dimensions.length
        ))
        .into());
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_file_accepts_a_bare_plot_and_defaults_rooms() {
        let plan: PlanFile =
            serde_json::from_str(r#"{"dimensions": {"width": 30.0, "length": 20.0}}"#)
                .expect("plan file");
        assert!(plan.rooms.is_empty());
        assert_eq!(plan.dimensions.area(), 600.0);
    }

    #[test]
    fn plan_file_ignores_server_side_fields() {
        let plan: PlanFile = serde_json::from_str(
            r#"{
                "id": "fp-000001",
                "status": "completed",
                "dimensions": {"width": 20.0, "length": 20.0},
                "rooms": [{
                    "id": "r1", "name": "Bedroom 1", "type": "bedroom",
                    "dimensions": {"width": 4.0, "length": 4.0},
                    "position": {"x": 0.0, "y": 0.0}
                }]
            }"#,
        )
        .expect("plan file");
        assert_eq!(plan.rooms.len(), 1);
        assert!(!plan.rooms[0].ai_generated);
    }
}
