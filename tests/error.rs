//! Tests for error module

use zonematch::error::{OptionExt, Stage, ZoneMatchError};

#[test]
fn test_error_display() {
    let err = ZoneMatchError::Schema {
        row: 7,
        field: "location_X".to_string(),
        reason: "value is missing".to_string(),
    };
    assert!(err.to_string().contains("row 7"));
    assert!(err.to_string().contains("location_X"));

    let err = ZoneMatchError::MissingPrerequisite {
        stage: Stage::Analysis,
        prerequisite: "correlated records",
    };
    assert_eq!(
        err.to_string(),
        "analysis stage requires correlated records, but none were provided"
    );
}

#[test]
fn test_option_ext() {
    let none: Option<f64> = None;
    let result = none.ok_or_missing_field(3, "Y2");
    assert!(matches!(
        result,
        Err(ZoneMatchError::Schema { row: 3, ref field, .. }) if field == "Y2"
    ));
    assert_eq!(Some(1.5).ok_or_missing_field(0, "X1").unwrap(), 1.5);
}

#[test]
fn test_in_stage_wraps_once() {
    let err = ZoneMatchError::DegenerateVector
        .in_stage(Stage::Analysis, "record 4")
        .in_stage(Stage::Aggregation, "ignored");

    assert_eq!(err.stage(), Some(Stage::Analysis));
    assert!(matches!(err.root_cause(), ZoneMatchError::DegenerateVector));
    assert!(err.to_string().starts_with("analysis stage failed (record 4)"));
}
