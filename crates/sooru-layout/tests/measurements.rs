use sooru_core::RoomId;
use sooru_layout::compute_measurements;
use sooru_model::{Dimensions, Position, Room, RoomType};

fn room(seq: u64, room_type: RoomType, w: f64, l: f64, x: f64) -> Room {
    Room::new(
        RoomId::from_seq(seq),
        format!("{room_type} {seq}"),
        room_type,
        Dimensions::new(w, l),
        Position::new(x, 0.0),
    )
}

#[test]
fn utilization_is_rooms_area_over_plot_area() {
    let rooms = [room(1, RoomType::Study, 4.0, 5.0, 0.0), room(2, RoomType::Other, 5.0, 6.0, 4.0)];
    let m = compute_measurements(&Dimensions::new(10.0, 10.0), &rooms);
    assert_eq!(m.total_area, 100.0);
    assert_eq!(m.rooms_area, 50.0);
    assert_eq!(m.available_area, 50.0);
    assert_eq!(m.utilization_percentage, 50.0);
}

#[test]
fn area_by_type_lists_only_present_types() {
    let rooms = [
        room(1, RoomType::Bedroom, 4.0, 4.0, 0.0),
        room(2, RoomType::Bedroom, 4.0, 4.0, 4.0),
        room(3, RoomType::Kitchen, 4.0, 5.0, 8.0),
    ];
    let m = compute_measurements(&Dimensions::new(30.0, 20.0), &rooms);
    assert_eq!(m.area_by_type.len(), 2);
    assert_eq!(m.area_by_type[&RoomType::Bedroom], 32.0);
    assert_eq!(m.area_by_type[&RoomType::Kitchen], 20.0);

    let json = serde_json::to_value(&m).expect("encode");
    assert_eq!(json["area_by_type"]["bedroom"], 32.0);
}

#[test]
fn overlapping_input_is_summed_not_corrected() {
    let rooms = [room(1, RoomType::Other, 10.0, 10.0, 0.0), room(2, RoomType::Other, 10.0, 10.0, 0.0)];
    let m = compute_measurements(&Dimensions::new(10.0, 10.0), &rooms);
    assert_eq!(m.available_area, -100.0);
    assert_eq!(m.utilization_percentage, 200.0);
}

#[test]
fn empty_plan_uses_nothing() {
    let m = compute_measurements(&Dimensions::new(20.0, 20.0), &[]);
    assert_eq!(m.rooms_area, 0.0);
    assert_eq!(m.utilization_percentage, 0.0);
    assert!(m.area_by_type.is_empty());
}
