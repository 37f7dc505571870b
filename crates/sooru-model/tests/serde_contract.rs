use serde_json::json;
use sooru_model::{AiSettings, FloorPlan, OptimizeFor, PlanStatus, Requirements, Room, Style};

#[test]
fn requirements_defaults_match_the_wire_contract() {
    let req: Requirements = serde_json::from_value(json!({"bedrooms": 2, "bathrooms": 1}))
        .expect("requirements");
    assert!(req.has_kitchen);
    assert!(req.has_living_room);
    assert!(!req.has_dining_room);
    assert!(req.additional_rooms.is_empty());
}

#[test]
fn ai_settings_use_snake_case_enums() {
    let settings: AiSettings = serde_json::from_value(json!({
        "style": "minimalist",
        "optimize_for": "natural_light",
        "constraints": ["south facing"]
    }))
    .expect("settings");
    assert_eq!(settings.style, Style::Minimalist);
    assert_eq!(settings.optimize_for, OptimizeFor::NaturalLight);
    assert_eq!(AiSettings::default().style, Style::Flexible);
}

#[test]
fn room_type_is_serialized_under_type_key() {
    let room: Room = serde_json::from_value(json!({
        "id": "r1",
        "name": "Kitchen",
        "type": "kitchen",
        "dimensions": {"width": 4.0, "length": 4.0},
        "position": {"x": 8.0, "y": 0.0}
    }))
    .expect("room");
    assert!(!room.ai_generated);
    let back = serde_json::to_value(&room).expect("encode");
    assert_eq!(back["type"], "kitchen");
}

#[test]
fn unknown_fields_and_values_are_rejected() {
    assert!(serde_json::from_value::<Requirements>(json!({"garages": 1})).is_err());
    assert!(serde_json::from_value::<PlanStatus>(json!("archived")).is_err());
}

#[test]
fn unsaved_plan_omits_id() {
    let plan: FloorPlan = serde_json::from_value(json!({
        "name": "Plan",
        "project_id": "prj-000001",
        "dimensions": {"width": 30.0, "length": 20.0},
        "created_by": "usr-000001"
    }))
    .expect("plan");
    assert_eq!(plan.status, PlanStatus::Draft);
    let encoded = serde_json::to_value(&plan).expect("encode");
    assert!(encoded.get("id").is_none());
}
