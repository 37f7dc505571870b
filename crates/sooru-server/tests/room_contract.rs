mod support;

use serde_json::{json, Value};
use std::net::SocketAddr;
use support::{call, create_project, initialize_plan, register, spawn_server, RawResponse};

struct Fixture {
    addr: SocketAddr,
    token: String,
    project_id: String,
    plan_id: String,
}

impl Fixture {
    fn rooms_path(&self) -> String {
        format!(
            "/api/projects/{}/floorplans/{}/rooms",
            self.project_id, self.plan_id
        )
    }

    async fn add(&self, name: &str, w: f64, l: f64, x: f64, y: f64) -> RawResponse {
        call(
            self.addr,
            "POST",
            &self.rooms_path(),
            Some(&self.token),
            Some(json!({
                "name": name,
                "type": "bedroom",
                "dimensions": {"width": w, "length": l},
                "position": {"x": x, "y": y},
            })),
        )
        .await
    }

    async fn send(&self, method: &str, suffix: &str, body: Option<Value>) -> RawResponse {
        call(
            self.addr,
            method,
            &format!("{}{suffix}", self.rooms_path()),
            Some(&self.token),
            body,
        )
        .await
    }
}

async fn fixture(server_addr: SocketAddr) -> Fixture {
    let (token, _) = register(server_addr, "Alice", "alice@example.com").await;
    let project_id = create_project(server_addr, &token, "Lake House").await;
    let plan_id = initialize_plan(server_addr, &token, &project_id, 20.0, 20.0).await;
    Fixture {
        addr: server_addr,
        token,
        project_id,
        plan_id,
    }
}

#[tokio::test]
async fn add_room_enforces_containment_and_overlap() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;

    let resp = fx.add("Bedroom 1", 4.0, 4.0, 0.0, 0.0).await;
    assert_eq!(resp.status, 201, "{}", resp.body);
    assert_eq!(resp.json()["id"], "r1");
    assert_eq!(resp.json()["ai_generated"], false);

    let resp = fx.add("Overlaps", 4.0, 4.0, 2.0, 2.0).await;
    assert_eq!(resp.status, 422);
    let err = &resp.json()["error"];
    assert_eq!(err["code"], "PlacementRejected");

    let resp = fx.add("Outside", 4.0, 4.0, 18.0, 18.0).await;
    assert_eq!(resp.status, 422);

    let resp = fx.add("Touching", 4.0, 4.0, 4.0, 0.0).await;
    assert_eq!(resp.status, 201, "{}", resp.body);
    assert_eq!(resp.json()["id"], "r2");

    let resp = fx.add("Flat", 0.0, 4.0, 10.0, 10.0).await;
    assert_eq!(resp.status, 400);
    assert_eq!(resp.json()["error"]["code"], "InvalidDimensions");

    let added = server.events.on_topic(&format!("project-{}", fx.project_id));
    let names: Vec<&str> = added.iter().map(|e| e.event.as_str()).collect();
    assert_eq!(names.iter().filter(|n| **n == "room-added").count(), 2);
    assert_eq!(added.last().expect("event").payload["room"]["id"], "r2");
}

#[tokio::test]
async fn update_room_is_checked_against_siblings_only() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;
    fx.add("Bedroom 1", 4.0, 4.0, 0.0, 0.0).await;
    fx.add("Bedroom 2", 4.0, 4.0, 4.0, 0.0).await;

    let resp = fx
        .send("PUT", "/r2", Some(json!({"position": {"x": 2.0, "y": 0.0}})))
        .await;
    assert_eq!(resp.status, 422, "{}", resp.body);

    let resp = fx
        .send(
            "PUT",
            "/r2",
            Some(json!({"name": "Primary", "dimensions": {"width": 4.0, "length": 6.0}})),
        )
        .await;
    assert_eq!(resp.status, 200, "{}", resp.body);
    let room = resp.json();
    assert_eq!(room["name"], "Primary");
    assert_eq!(room["position"], json!({"x": 4.0, "y": 0.0}));

    let resp = fx
        .send("PUT", "/r9", Some(json!({"name": "Ghost"})))
        .await;
    assert_eq!(resp.status, 404);

    let events = server.events.on_topic(&format!("floorplan-{}", fx.plan_id));
    assert!(events.iter().all(|e| e.event == "floorplan-updated"));
    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn deleted_room_ids_are_not_reused() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;
    fx.add("Bedroom 1", 4.0, 4.0, 0.0, 0.0).await;
    fx.add("Bedroom 2", 4.0, 4.0, 4.0, 0.0).await;

    let resp = fx.send("DELETE", "/r2", None).await;
    assert_eq!(resp.status, 200, "{}", resp.body);
    assert_eq!(fx.send("DELETE", "/r2", None).await.status, 404);

    let resp = fx.add("Bedroom 3", 4.0, 4.0, 4.0, 0.0).await;
    assert_eq!(resp.status, 201);
    assert_eq!(resp.json()["id"], "r3");

    let deleted = server.events.on_topic(&format!("project-{}", fx.project_id));
    assert!(deleted
        .iter()
        .any(|e| e.event == "room-deleted" && e.payload["room_id"] == "r2"));
}

#[tokio::test]
async fn measurements_sum_room_areas() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;
    fx.add("Bedroom 1", 4.0, 4.0, 0.0, 0.0).await;
    fx.add("Bedroom 2", 4.0, 6.0, 4.0, 0.0).await;

    let resp = fx.send("GET", "/measurements", None).await;
    assert_eq!(resp.status, 200, "{}", resp.body);
    let m = resp.json();
    assert_eq!(m["total_area"], 400.0);
    assert_eq!(m["rooms_area"], 40.0);
    assert_eq!(m["available_area"], 360.0);
    let utilization = m["utilization_percentage"].as_f64().expect("utilization");
    assert!((utilization - 10.0).abs() < 1e-9);
    assert_eq!(m["area_by_type"], json!({"bedroom": 40.0}));
}

#[tokio::test]
async fn validate_reports_geometry_without_saving() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;
    fx.add("Bedroom 1", 4.0, 4.0, 0.0, 0.0).await;

    let candidate = |room_id: Option<&str>, w: f64, x: f64| {
        let mut body = json!({
            "dimensions": {"width": w, "length": 4.0},
            "position": {"x": x, "y": 0.0},
        });
        if let Some(id) = room_id {
            body["room_id"] = json!(id);
        }
        body
    };

    let resp = fx.send("POST", "/validate", Some(candidate(None, 4.0, 0.0))).await;
    assert_eq!(resp.status, 200, "{}", resp.body);
    assert_eq!(resp.json(), json!({"valid": false}));

    let resp = fx.send("POST", "/validate", Some(candidate(None, 4.0, 4.0))).await;
    assert_eq!(resp.json(), json!({"valid": true}));

    let resp = fx
        .send("POST", "/validate", Some(candidate(Some("r1"), 4.0, 1.0)))
        .await;
    assert_eq!(resp.json(), json!({"valid": true}));

    let resp = fx.send("POST", "/validate", Some(candidate(None, -1.0, 4.0))).await;
    assert_eq!(resp.status, 400);

    let resp = fx.send("GET", "/measurements", None).await;
    assert_eq!(resp.json()["rooms_area"], 16.0);
}

#[tokio::test]
async fn rooms_are_private_to_the_plan_owner_and_project() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;
    let (bob, _) = register(fx.addr, "Bob", "bob@example.com").await;
    let other_project = create_project(fx.addr, &fx.token, "Cabin").await;

    let resp = call(
        fx.addr,
        "GET",
        &format!("{}/measurements", fx.rooms_path()),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(resp.status, 404);

    let resp = call(
        fx.addr,
        "GET",
        &format!(
            "/api/projects/{other_project}/floorplans/{}/rooms/measurements",
            fx.plan_id
        ),
        Some(&fx.token),
        None,
    )
    .await;
    assert_eq!(resp.status, 404);
}

#[tokio::test]
async fn regenerated_rooms_continue_the_room_sequence() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;
    fx.add("Bedroom 1", 4.0, 4.0, 0.0, 0.0).await;
    fx.add("Bedroom 2", 4.0, 4.0, 4.0, 0.0).await;
    assert_eq!(fx.send("DELETE", "/r2", None).await.status, 200);

    let resp = call(
        fx.addr,
        "POST",
        &format!("/api/floorplans/{}/rooms/intake", fx.plan_id),
        Some(&fx.token),
        Some(json!({"rooms": [{"type": "bedroom"}]})),
    )
    .await;
    assert_eq!(resp.status, 200, "{}", resp.body);
    let rooms = resp.json()["floor_plan"]["rooms"].clone();
    let ids: Vec<&str> = rooms
        .as_array()
        .expect("rooms")
        .iter()
        .map(|r| r["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["r3"]);

    let resp = fx.add("Study", 4.0, 4.0, 8.0, 8.0).await;
    assert_eq!(resp.status, 201, "{}", resp.body);
    assert_eq!(resp.json()["id"], "r4");
}

#[tokio::test]
async fn negative_positions_are_input_errors_not_rejections() {
    let server = spawn_server().await;
    let fx = fixture(server.addr).await;
    fx.add("Bedroom 1", 4.0, 4.0, 0.0, 0.0).await;

    let resp = fx.add("Stray", 4.0, 4.0, -1.0, 0.0).await;
    assert_eq!(resp.status, 400, "{}", resp.body);
    assert_eq!(resp.json()["error"]["code"], "ValidationFailed");

    let resp = fx
        .send("PUT", "/r1", Some(json!({"position": {"x": -2.0, "y": 0.0}})))
        .await;
    assert_eq!(resp.status, 400, "{}", resp.body);
    assert_eq!(resp.json()["error"]["code"], "ValidationFailed");
}
