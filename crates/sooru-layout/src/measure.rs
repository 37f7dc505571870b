// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use sooru_model::{Dimensions, Room, RoomType};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurements {
    pub total_area: f64,
    pub rooms_area: f64,
    pub available_area: f64,
    pub utilization_percentage: f64,
    pub area_by_type: BTreeMap<RoomType, f64>,
}

/// Plain sums over `rooms`. Overlaps are not subtracted, so input that breaks
/// the placement rules can yield negative available area or over 100% use.
#[must_use]
pub fn compute_measurements(plot: &Dimensions, rooms: &[Room]) -> Measurements {
    let total_area = plot.area();
    let mut rooms_area = 0.0;
    let mut area_by_type = BTreeMap::new();
    for room in rooms {
        let area = room.area();
        rooms_area += area;
        *area_by_type.entry(room.room_type).or_insert(0.0) += area;
    }
    Measurements {
        total_area,
        rooms_area,
        available_area: total_area - rooms_area,
        utilization_percentage: rooms_area / total_area * 100.0,
        area_by_type,
    }
}
