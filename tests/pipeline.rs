//! End-to-end pipeline scenarios

use chrono::{Duration, NaiveDate, NaiveDateTime};
use zonematch::{
    CorrelationConfig, LocationSample, Point3D, Stage, ZoneDefinition, ZoneMatchError, run_pipeline,
};

fn ts(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + Duration::seconds(secs)
}

fn office() -> ZoneDefinition {
    ZoneDefinition::new(
        "Generic Models: Workspace",
        Some("office"),
        [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(5.0, 0.0, 0.0),
            Point3D::new(5.0, 5.0, 0.0),
            Point3D::new(0.0, 5.0, 0.0),
        ],
    )
}

fn two_samples() -> Vec<LocationSample> {
    vec![
        LocationSample::new(ts(0), 1.0, 1.0, 0.0),
        LocationSample::new(ts(3), 2.0, 2.0, 0.0),
    ]
}

#[test]
fn test_scenario_both_samples_survive() {
    let output = run_pipeline(
        two_samples(),
        &[office()],
        &CorrelationConfig {
            max_diff_seconds: 5.0,
        },
    )
    .unwrap();

    assert_eq!(output.correlated_count, 2);
    let diffs: Vec<Option<f64>> = output
        .analyzed
        .iter()
        .map(|r| r.record.diff_seconds)
        .collect();
    assert_eq!(diffs, vec![None, Some(3.0)]);

    assert_eq!(output.patterns.len(), 1);
    assert_eq!(output.patterns[0].label, "office");
    assert_eq!(output.patterns[0].count, 2);
    assert_eq!(output.patterns[0].membership_sum, 2);
    assert_eq!(output.patterns[0].diff_sum, 3.0);
}

#[test]
fn test_scenario_gap_rejected() {
    let output = run_pipeline(
        two_samples(),
        &[office()],
        &CorrelationConfig {
            max_diff_seconds: 2.0,
        },
    )
    .unwrap();

    assert_eq!(output.correlated_count, 1);
    assert_eq!(output.patterns[0].count, 1);
    assert_eq!(output.analyzed[0].record.sample.timestamp, ts(0));
}

#[test]
fn test_duplicate_timestamps_are_collapsed() {
    let mut samples = two_samples();
    samples.push(LocationSample::new(ts(3), 4.0, 4.0, 0.0));

    let output = run_pipeline(samples, &[office()], &CorrelationConfig::default()).unwrap();
    assert_eq!(output.correlated_count, 2);
    assert_eq!(output.analyzed[1].record.sample.location.x, 2.0);
}

#[test]
fn test_dwell_matches_patterns() {
    let output = run_pipeline(two_samples(), &[office()], &CorrelationConfig::default()).unwrap();
    assert_eq!(output.dwell.len(), 1);
    assert_eq!(output.dwell[0].time_spent, output.patterns[0].diff_sum);
    assert_eq!(output.dwell[0].records_number, output.patterns[0].count);
}

#[test]
fn test_fails_fast_on_degenerate_zone() {
    let mut broken = office();
    broken.vertices[3] = broken.vertices[0];

    let err = run_pipeline(two_samples(), &[office(), broken], &CorrelationConfig::default())
        .unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Analysis));
    assert!(matches!(
        err.root_cause(),
        ZoneMatchError::DegenerateSegment { .. }
    ));
}

#[test]
fn test_no_samples_is_a_correlation_error() {
    let err = run_pipeline(vec![], &[office()], &CorrelationConfig::default()).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Correlation));
    assert!(matches!(
        err.root_cause(),
        ZoneMatchError::MissingPrerequisite { .. }
    ));
}
