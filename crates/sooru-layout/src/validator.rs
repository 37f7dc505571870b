use sooru_model::{Dimensions, Position, Room};

use crate::geometry::{contains_rect, rectangles_overlap, Rect};
use crate::LayoutError;

/// True iff the plot contains `candidate` and it overlaps none of `existing`.
#[must_use]
pub fn validate_placement(plot: &Dimensions, existing: &[Room], candidate: &Rect) -> bool {
    contains_rect(&Rect::plot(plot), candidate)
        && existing
            .iter()
            .all(|room| !rectangles_overlap(&Rect::of_room(room), candidate))
}

pub fn check_placement(
    plot: &Dimensions,
    existing: &[Room],
    dimensions: &Dimensions,
    position: &Position,
) -> Result<(), LayoutError> {
    if !dimensions.is_positive() {
        return Err(LayoutError::InvalidDimensions(format!(
            "room must have positive width and length, got {}x{}",
            dimensions.width, dimensions.length
        )));
    }
    if !position.x.is_finite() || !position.y.is_finite() {
        return Err(LayoutError::InvalidDimensions(
            "room position must be finite".to_string(),
        ));
    }
    if validate_placement(plot, existing, &Rect::at(position, dimensions)) {
        Ok(())
    } else {
        Err(LayoutError::PlacementRejected)
    }
}

/// Re-check an edited room against its siblings. The room's own previous
/// rectangle in `rooms` is ignored.
pub fn check_room_update(plot: &Dimensions, rooms: &[Room], updated: &Room) -> Result<(), LayoutError> {
    let siblings: Vec<Room> = rooms
        .iter()
        .filter(|room| room.id != updated.id)
        .cloned()
        .collect();
    check_placement(plot, &siblings, &updated.dimensions, &updated.position)
}

pub fn validate_room_set(plot: &Dimensions, rooms: &[Room]) -> Result<(), LayoutError> {
    let outer = Rect::plot(plot);
    let rects: Vec<Rect> = rooms.iter().map(Rect::of_room).collect();
    for (i, room) in rooms.iter().enumerate() {
        if !room.dimensions.is_positive() {
            return Err(LayoutError::InvalidDimensions(format!(
                "room `{}` must have positive width and length",
                room.id
            )));
        }
        if !contains_rect(&outer, &rects[i]) {
            return Err(LayoutError::PlacementRejected);
        }
        if rects[i + 1..]
            .iter()
            .any(|other| rectangles_overlap(&rects[i], other))
        {
            return Err(LayoutError::PlacementRejected);
        }
    }
    Ok(())
}
