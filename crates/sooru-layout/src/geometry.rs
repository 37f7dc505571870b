use sooru_model::{Dimensions, Position, Room};

/// Axis-aligned rectangle as two corners, `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    #[must_use]
    pub fn at(position: &Position, dimensions: &Dimensions) -> Self {
        Self {
            x1: position.x,
            y1: position.y,
            x2: position.x + dimensions.width,
            y2: position.y + dimensions.length,
        }
    }

    /// The plot rectangle, anchored at the origin.
    #[must_use]
    pub fn plot(dimensions: &Dimensions) -> Self {
        Self::at(&Position::default(), dimensions)
    }

    #[must_use]
    pub fn of_room(room: &Room) -> Self {
        Self::at(&room.position, &room.dimensions)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }
}

/// Interiors intersect. Shared edges and corners do not count.
#[must_use]
pub fn rectangles_overlap(a: &Rect, b: &Rect) -> bool {
    let separated = a.x2 <= b.x1 || b.x2 <= a.x1 || a.y2 <= b.y1 || b.y2 <= a.y1;
    !separated
}

#[must_use]
pub fn contains_rect(outer: &Rect, inner: &Rect) -> bool {
    inner.x1 >= outer.x1 && inner.y1 >= outer.y1 && inner.x2 <= outer.x2 && inner.y2 <= outer.y2
}
