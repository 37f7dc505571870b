use serde::Serialize;
use sooru_model::{Dimensions, RoomType};
use std::collections::BTreeMap;

use crate::LayoutError;

pub const PLOT_MIN_FT: f64 = 20.0;
pub const PLOT_MAX_FT: f64 = 200.0;
/// Plot area (sq ft) at which suggestions equal the reference sizes.
pub const REFERENCE_PLOT_AREA: f64 = 2400.0;

/// Room types with a reference size, in table order.
pub const SUGGESTED_ROOM_TYPES: [RoomType; 6] = [
    RoomType::Bedroom,
    RoomType::Bathroom,
    RoomType::Kitchen,
    RoomType::Living,
    RoomType::Dining,
    RoomType::Study,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoomSuggestion {
    pub width: f64,
    pub length: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub min_length: f64,
    pub max_length: f64,
}

pub fn reference_dimensions(room_type: RoomType) -> Result<Dimensions, LayoutError> {
    let dims = match room_type {
        RoomType::Bedroom => Dimensions::new(12.0, 12.0),
        RoomType::Bathroom => Dimensions::new(8.0, 6.0),
        RoomType::Kitchen => Dimensions::new(12.0, 10.0),
        RoomType::Living => Dimensions::new(16.0, 14.0),
        RoomType::Dining => Dimensions::new(12.0, 10.0),
        RoomType::Study => Dimensions::new(10.0, 10.0),
        RoomType::Other => return Err(LayoutError::InvalidRoomType(room_type)),
    };
    Ok(dims)
}

/// Reference sizes scaled by `sqrt(plot_area / 2400)`. The min/max bounds stay
/// at 80%/120% of the unscaled reference regardless of plot size.
#[must_use]
pub fn suggest_dimensions(plot_width: f64, plot_length: f64) -> BTreeMap<RoomType, RoomSuggestion> {
    let scale = (plot_width * plot_length / REFERENCE_PLOT_AREA).sqrt();
    let mut out = BTreeMap::new();
    for room_type in SUGGESTED_ROOM_TYPES {
        let Ok(base) = reference_dimensions(room_type) else {
            continue;
        };
        out.insert(
            room_type,
            RoomSuggestion {
                width: (base.width * scale).round(),
                length: (base.length * scale).round(),
                min_width: (base.width * 0.8).round(),
                max_width: (base.width * 1.2).round(),
                min_length: (base.length * 0.8).round(),
                max_length: (base.length * 1.2).round(),
            },
        );
    }
    out
}

pub fn validate_plot_dimensions(width: f64, length: f64) -> Result<Dimensions, LayoutError> {
    if !width.is_finite() || !length.is_finite() {
        return Err(LayoutError::InvalidDimensions(
            "plot dimensions must be finite numbers".to_string(),
        ));
    }
    if width < PLOT_MIN_FT || length < PLOT_MIN_FT {
        return Err(LayoutError::InvalidDimensions(format!(
            "plot dimensions must be at least {PLOT_MIN_FT}x{PLOT_MIN_FT} feet"
        )));
    }
    if width > PLOT_MAX_FT || length > PLOT_MAX_FT {
        return Err(LayoutError::InvalidDimensions(format!(
            "plot dimensions cannot exceed {PLOT_MAX_FT}x{PLOT_MAX_FT} feet"
        )));
    }
    Ok(Dimensions::new(width, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_bounds_are_inclusive() {
        assert!(validate_plot_dimensions(20.0, 20.0).is_ok());
        assert!(validate_plot_dimensions(200.0, 200.0).is_ok());
        assert!(matches!(validate_plot_dimensions(19.9, 20.0), Err(LayoutError::InvalidDimensions(_))));
        assert!(matches!(validate_plot_dimensions(200.1, 50.0), Err(LayoutError::InvalidDimensions(_))));
        assert!(validate_plot_dimensions(f64::NAN, 50.0).is_err());
    }

    #[test]
    fn reference_area_plot_gets_unscaled_defaults() {
        let s = suggest_dimensions(60.0, 40.0);
        let bedroom = s[&RoomType::Bedroom];
        assert_eq!((bedroom.width, bedroom.length), (12.0, 12.0));
        assert_eq!((bedroom.min_width, bedroom.max_width), (10.0, 14.0));
        let living = s[&RoomType::Living];
        assert_eq!((living.width, living.length), (16.0, 14.0));
        assert!(!s.contains_key(&RoomType::Other));
        assert_eq!(s.len(), 6);
    }

    #[test]
    fn bounds_do_not_follow_the_scale() {
        let s = suggest_dimensions(120.0, 80.0);
        let bedroom = s[&RoomType::Bedroom];
        assert_eq!(bedroom.width, 24.0);
        assert_eq!(bedroom.max_width, 14.0);
    }

    #[test]
    fn other_has_no_reference_size() {
        assert_eq!(
            reference_dimensions(RoomType::Other),
            Err(LayoutError::InvalidRoomType(RoomType::Other))
        );
    }
}
