// SPDX-License-Identifier: Apache-2.0

use sooru_core::RoomId;
use sooru_model::{AiSettings, Dimensions, Position, Requirements, Room, RoomType};

use crate::render::render_svg;

pub const BEDROOM_SIZE: Dimensions = Dimensions::new(4.0, 4.0);
pub const BATHROOM_SIZE: Dimensions = Dimensions::new(2.0, 3.0);
pub const KITCHEN_SIZE: Dimensions = Dimensions::new(4.0, 4.0);
pub const LIVING_SIZE: Dimensions = Dimensions::new(6.0, 5.0);

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLayout {
    pub rooms: Vec<Room>,
    pub layout_svg: String,
}

/// Placeholder generator: a bedroom row, a bathroom row beneath it, then the
/// kitchen and living room to the right of the bedrooms.
///
/// The output is not checked against the plot or for overlaps; callers that
/// need a fitting layout run [`crate::validate_room_set`] on the result.
/// `settings` is accepted for forward compatibility and does not affect output.
#[must_use]
pub fn generate_layout(
    requirements: &Requirements,
    plot: &Dimensions,
    _settings: &AiSettings,
) -> GeneratedLayout {
    let mut emitter = Emitter::default();

    let mut x = 0.0;
    for n in 1..=requirements.bedrooms {
        emitter.push(format!("Bedroom {n}"), RoomType::Bedroom, BEDROOM_SIZE, x, 0.0);
        x += BEDROOM_SIZE.width;
    }
    let service_x = x;

    x = 0.0;
    for n in 1..=requirements.bathrooms {
        emitter.push(
            format!("Bathroom {n}"),
            RoomType::Bathroom,
            BATHROOM_SIZE,
            x,
            BEDROOM_SIZE.length,
        );
        x += BATHROOM_SIZE.width;
    }

    if requirements.has_kitchen {
        emitter.push("Kitchen".to_string(), RoomType::Kitchen, KITCHEN_SIZE, service_x, 0.0);
    }
    if requirements.has_living_room {
        emitter.push(
            "Living Room".to_string(),
            RoomType::Living,
            LIVING_SIZE,
            service_x + KITCHEN_SIZE.width,
            0.0,
        );
    }

    let layout_svg = render_svg(plot, &emitter.rooms);
    GeneratedLayout {
        rooms: emitter.rooms,
        layout_svg,
    }
}

#[derive(Default)]
struct Emitter {
    rooms: Vec<Room>,
}

impl Emitter {
    fn push(&mut self, name: String, room_type: RoomType, size: Dimensions, x: f64, y: f64) {
        let id = RoomId::from_seq(self.rooms.len() as u64 + 1);
        self.rooms
            .push(Room::new(id, name, room_type, size, Position::new(x, y)).generated());
    }
}
