//! Stress tests over synthetic floors

#![cfg(feature = "synthetic")]

use zonematch::synthetic::SyntheticScenario;
use zonematch::{CorrelationConfig, run_pipeline};

#[test]
fn test_generation_is_deterministic() {
    let scenario = SyntheticScenario::default();
    let a = scenario.generate();
    let b = scenario.generate();
    assert_eq!(a.samples, b.samples);
    assert_eq!(a.zones, b.zones);
    assert!(
        a.samples
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp)
    );
}

#[test]
fn test_pipeline_on_synthetic_floor() {
    let scenario = SyntheticScenario {
        sample_count: 400,
        gap_probability: 0.05,
        ..SyntheticScenario::default()
    };
    let data = scenario.generate();
    let zone_count = data.zones.len();

    let output = run_pipeline(
        data.samples.clone(),
        &data.zones,
        &CorrelationConfig::default(),
    )
    .unwrap();

    // Each long gap removes exactly the first zone replica of one sample
    assert_eq!(
        output.correlated_count,
        data.samples.len() * zone_count - data.gap_count
    );
    assert_eq!(output.patterns.len(), zone_count);

    // Zones do not overlap, so each sample is inside at most one zone
    let inside: usize = output.patterns.iter().map(|p| p.membership_sum).sum();
    assert!(inside <= data.samples.len());
    for p in &output.patterns {
        assert_eq!(p.membership_mean, p.membership_sum as f64 / p.count as f64);
    }
}
