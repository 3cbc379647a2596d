//! Tests for configuration

use std::path::PathBuf;
use zonematch::{Config, CorrelationConfig, ZoneMatchError};

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.max_diff_seconds, 5.0);
    assert_eq!(config.default_z_coordinate, 0.0);
    assert_eq!(
        config.zones_path,
        PathBuf::from("data").join("model_zone_detection5.csv")
    );
    assert_eq!(config.output_dir, PathBuf::from("data").join("output"));
    assert_eq!(config.correlation(), CorrelationConfig::default());
}

#[test]
fn test_partial_json_uses_defaults() {
    let config: Config = serde_json::from_str(r#"{ "max_diff_seconds": 2.5 }"#).unwrap();
    assert_eq!(config.max_diff_seconds, 2.5);
    assert_eq!(config.default_z_coordinate, 0.0);
    assert_eq!(config.correlation().max_diff_seconds, 2.5);
}

#[test]
fn test_with_data_dir() {
    let config = Config::with_data_dir("/srv/rtls");
    assert_eq!(
        config.samples_path,
        PathBuf::from("/srv/rtls/Experiment8_zone_detection_pattern6.csv")
    );
}

#[test]
fn test_validate_rejects_negative_threshold() {
    let config = Config {
        max_diff_seconds: -1.0,
        ..Config::default()
    };
    assert!(matches!(config.validate(), Err(ZoneMatchError::Config(_))));

    let config = Config {
        max_diff_seconds: f64::NAN,
        ..Config::default()
    };
    assert!(config.validate().is_err());
    assert!(Config::default().validate().is_ok());
}
