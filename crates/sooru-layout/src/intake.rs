use serde::{Deserialize, Serialize};
use sooru_model::{Dimensions, Requirements, RoomType};

use crate::suggest::{reference_dimensions, validate_plot_dimensions};
use crate::LayoutError;

/// Share of the plot that rooms may occupy; the rest is walls and circulation.
pub const CAPACITY_RATIO: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomRequest {
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeRoom {
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub name: Option<String>,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intake {
    pub dimensions: Dimensions,
    pub rooms: Vec<IntakeRoom>,
    pub requirements: Requirements,
}

pub fn process_room_intake(
    plot_width: f64,
    plot_length: f64,
    rooms: &[RoomRequest],
) -> Result<Intake, LayoutError> {
    let dimensions = validate_plot_dimensions(plot_width, plot_length)?;

    let mut processed = Vec::with_capacity(rooms.len());
    let mut rooms_area = 0.0;
    for request in rooms {
        let dims = match request.dimensions {
            Some(explicit) if explicit.is_positive() => explicit,
            Some(explicit) => {
                return Err(LayoutError::InvalidDimensions(format!(
                    "{} must have positive width and length, got {}x{}",
                    request.room_type, explicit.width, explicit.length
                )))
            }
            None => reference_dimensions(request.room_type)?,
        };
        rooms_area += dims.area();
        processed.push(IntakeRoom {
            room_type: request.room_type,
            name: request.name.clone(),
            dimensions: dims,
        });
    }

    let limit = dimensions.area() * CAPACITY_RATIO;
    if rooms_area > limit {
        return Err(LayoutError::CapacityExceeded { rooms_area, limit });
    }

    let count = |t: RoomType| processed.iter().filter(|r| r.room_type == t).count() as u32;
    let has = |t: RoomType| processed.iter().any(|r| r.room_type == t);
    let requirements = Requirements {
        bedrooms: count(RoomType::Bedroom),
        bathrooms: count(RoomType::Bathroom),
        has_kitchen: has(RoomType::Kitchen),
        has_living_room: has(RoomType::Living),
        has_dining_room: has(RoomType::Dining),
        ..Requirements::default()
    };

    Ok(Intake {
        dimensions,
        rooms: processed,
        requirements,
    })
}
