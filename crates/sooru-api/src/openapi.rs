use serde_json::{json, Map, Value};

use crate::API_ERROR_CODES;

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}
    })
}

fn op(summary: &str, ok: &str, errors: &[(&str, &str)]) -> Value {
    let mut responses = Map::new();
    responses.insert(ok.to_string(), json!({"description": summary}));
    for (status, description) in errors {
        responses.insert((*status).to_string(), error_response(description));
    }
    json!({"summary": summary, "responses": responses})
}

const AUTH: (&str, &str) = ("401", "missing or invalid bearer token");
const BAD: (&str, &str) = ("400", "invalid request");
const MISSING: (&str, &str) = ("404", "not found");
const STALE: (&str, &str) = ("409", "concurrent modification");
const REJECTED: (&str, &str) = ("422", "placement or capacity rejected");

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let codes: Vec<&str> = API_ERROR_CODES.iter().map(|c| c.as_str()).collect();
    json!({
      "openapi": "3.0.3",
      "info": {"title": "sooru floor-plan API", "version": "v1"},
      "paths": {
        "/": {"get": op("welcome message", "200", &[])},
        "/api/floorplans/initialize": {"post": op("create draft plan with suggestions", "201", &[AUTH, BAD, MISSING])},
        "/api/floorplans/suggestions": {"get": op("room size suggestions for a plot", "200", &[BAD])},
        "/api/floorplans/{plan_id}": {
          "delete": op("delete floor plan", "200", &[AUTH, MISSING]),
          "get": op("floor plan", "200", &[AUTH, MISSING]),
          "put": op("update name, requirements or settings", "200", &[AUTH, BAD, MISSING, STALE])
        },
        "/api/floorplans/{plan_id}/rooms/intake": {"post": op("size rooms and generate layout", "200", &[AUTH, BAD, MISSING, STALE, REJECTED])},
        "/api/projects": {
          "get": op("own projects", "200", &[AUTH]),
          "post": op("create project", "201", &[AUTH, BAD])
        },
        "/api/projects/{project_id}": {
          "delete": op("delete project and its plans", "200", &[AUTH, MISSING]),
          "get": op("project", "200", &[AUTH, MISSING]),
          "put": op("rename project", "200", &[AUTH, BAD, MISSING, STALE])
        },
        "/api/projects/{project_id}/floorplans": {"get": op("plans in project, newest first", "200", &[AUTH, MISSING])},
        "/api/projects/{project_id}/floorplans/generate": {"post": op("generate placeholder layout", "201", &[AUTH, BAD, MISSING, STALE, REJECTED])},
        "/api/projects/{project_id}/floorplans/{plan_id}/rooms": {"post": op("add room", "201", &[AUTH, BAD, MISSING, STALE, REJECTED])},
        "/api/projects/{project_id}/floorplans/{plan_id}/rooms/measurements": {"get": op("area measurements", "200", &[AUTH, MISSING])},
        "/api/projects/{project_id}/floorplans/{plan_id}/rooms/validate": {"post": op("check a candidate placement", "200", &[AUTH, BAD, MISSING])},
        "/api/projects/{project_id}/floorplans/{plan_id}/rooms/{room_id}": {
          "delete": op("delete room", "200", &[AUTH, MISSING, STALE]),
          "put": op("update room", "200", &[AUTH, BAD, MISSING, STALE, REJECTED])
        },
        "/api/users/login": {"post": op("login", "200", &[BAD, AUTH])},
        "/api/users/profile": {"get": op("current user with projects", "200", &[AUTH])},
        "/api/users/register": {"post": op("register", "201", &[BAD])},
        "/healthz": {"get": op("ok", "200", &[])},
        "/v1/openapi.json": {"get": op("this document", "200", &[])}
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details", "request_id"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "details": {"type": "object"},
              "message": {"type": "string"},
              "request_id": {"type": "string"}
            }
          },
          "ApiErrorCode": {"type": "string", "enum": codes}
        }
      }
    })
}
