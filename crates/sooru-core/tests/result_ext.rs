// SPDX-License-Identifier: Apache-2.0

use sooru_core::{ErrorCode, ExitCode, MachineError, ResultExt, ERROR_CODES};

#[test]
fn result_ext_attaches_static_context_without_allocation() {
    let r: Result<(), &str> = Err("bad");
    let err = r.with_context("load floor plan").expect_err("must error");
    assert_eq!(err.context, "load floor plan");
    assert_eq!(err.source, "bad");
    assert_eq!(err.to_string(), "load floor plan: bad");
}

#[test]
fn error_codes_are_unique_and_map_to_exit_codes() {
    let mut names: Vec<&str> = ERROR_CODES.iter().map(|c| c.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), ERROR_CODES.len());

    assert_eq!(ErrorCode::UsageError.exit_code(), ExitCode::Usage);
    assert_eq!(ErrorCode::PlacementRejected.exit_code(), ExitCode::Validation);
    assert_eq!(ErrorCode::Internal.exit_code() as u8, 10);
}

#[test]
fn machine_error_serializes_details_sorted() {
    let err = MachineError::from_code(ErrorCode::InvalidDimensions, "plot too small")
        .with_detail("width", "19.9")
        .with_detail("length", "20");
    let json = serde_json::to_string(&err).expect("encode");
    assert_eq!(
        json,
        r#"{"code":"InvalidDimensions","message":"plot too small","details":{"length":"20","width":"19.9"}}"#
    );
}
