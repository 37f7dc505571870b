// SPDX-License-Identifier: Apache-2.0

use sooru_api::{map_error, ApiError, ApiErrorCode, API_ERROR_CODES, API_ERROR_SCHEMA_REF};
use sooru_layout::LayoutError;
use sooru_model::RoomType;

#[test]
fn status_codes_follow_error_class() {
    let status = |code| map_error(&ApiError::bare(code, "x")).status_code;
    assert_eq!(status(ApiErrorCode::ValidationFailed), 400);
    assert_eq!(status(ApiErrorCode::InvalidDimensions), 400);
    assert_eq!(status(ApiErrorCode::Unauthorized), 401);
    assert_eq!(status(ApiErrorCode::NotFound), 404);
    assert_eq!(status(ApiErrorCode::Conflict), 409);
    assert_eq!(status(ApiErrorCode::PayloadTooLarge), 413);
    assert_eq!(status(ApiErrorCode::PlacementRejected), 422);
    assert_eq!(status(ApiErrorCode::CapacityExceeded), 422);
    assert_eq!(status(ApiErrorCode::Internal), 500);
    for code in API_ERROR_CODES {
        assert_eq!(map_error(&ApiError::bare(code, "x")).schema_ref, API_ERROR_SCHEMA_REF);
    }
}

#[test]
fn layout_errors_keep_their_code_and_details() {
    let err = ApiError::from(LayoutError::CapacityExceeded {
        rooms_area: 432.0,
        limit: 340.0,
    });
    assert_eq!(err.code, ApiErrorCode::CapacityExceeded);
    assert_eq!(err.details["limit"], 340.0);

    let err = ApiError::from(LayoutError::InvalidRoomType(RoomType::Other));
    assert_eq!(err.code, ApiErrorCode::InvalidRoomType);
    assert_eq!(err.details["type"], "other");

    assert_eq!(ApiError::from(LayoutError::PlacementRejected).code, ApiErrorCode::PlacementRejected);
}

#[test]
fn error_body_serializes_all_four_fields() {
    let err = ApiError::not_found("floor plan", "fp-000009").with_request_id("req-1");
    let json = serde_json::to_value(&err).expect("encode");
    assert_eq!(json["code"], "NotFound");
    assert_eq!(json["request_id"], "req-1");
    assert_eq!(json["details"]["id"], "fp-000009");
}
