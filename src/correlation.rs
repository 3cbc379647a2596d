//! Temporal correlation of location samples with zones.
//!
//! Every sample is paired with every zone, the expanded sequence is ordered
//! by timestamp and each record receives the gap to the record before it.
//! Records whose gap exceeds the configured threshold are dropped.
//!
//! The gap is taken across the *whole* expanded sequence, not per zone. Each
//! sample appears once per zone with the same timestamp, so within a sample's
//! block all gaps after the first are zero and only the first record of each
//! block carries the real inter-sample gap. With `n` zones, a sample whose
//! predecessor is too far away loses only its first zone replica; the other
//! `n - 1` replicas survive with a zero gap. This is the established
//! behaviour of the dataset pipeline and is kept as is.

use std::sync::Arc;

use chrono::NaiveDateTime;
use log::{debug, info};

use crate::{
    CorrelatedRecord, CorrelationConfig, DEFAULT_ZONE_LABEL, LocationSample, Result, Stage,
    ZoneDefinition, ZoneMatchError,
};

/// Deduplicate samples by timestamp (first occurrence wins) and sort ascending.
pub fn prepare_samples(mut samples: Vec<LocationSample>) -> Vec<LocationSample> {
    let before = samples.len();
    // Stable, so the first occurrence of a timestamp stays first
    samples.sort_by_key(|s| s.timestamp);
    samples.dedup_by_key(|s| s.timestamp);
    if samples.len() < before {
        debug!(
            "Dropped {} samples with duplicate timestamps",
            before - samples.len()
        );
    }
    samples
}

/// Pair every sample with every zone.
///
/// Sample-major order: all zones for the first sample, then all zones for
/// the second, and so on. Yields exactly `samples.len() * zones.len()` records.
pub fn expand(samples: &[LocationSample], zones: &[ZoneDefinition]) -> Vec<CorrelatedRecord> {
    let shared: Vec<Arc<ZoneDefinition>> = zones.iter().cloned().map(Arc::new).collect();

    let mut records = Vec::with_capacity(samples.len() * shared.len());
    for sample in samples {
        for zone in &shared {
            records.push(CorrelatedRecord::new(*sample, Arc::clone(zone)));
        }
    }
    records
}

/// Seconds elapsed from `earlier` to `later`, with nanosecond resolution.
///
/// Spans too large for an `i64` of nanoseconds (about 292 years) fall back
/// to microseconds.
pub fn seconds_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    let delta = later - earlier;
    if let Some(ns) = delta.num_nanoseconds() {
        return ns as f64 / 1_000_000_000.0;
    }
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Fill `diff_seconds` for every record from its predecessor. The first stays `None`.
fn with_diffs(mut records: Vec<CorrelatedRecord>) -> Vec<CorrelatedRecord> {
    let mut previous: Option<NaiveDateTime> = None;
    for record in &mut records {
        let ts = record.sample.timestamp;
        record.diff_seconds = previous.map(|prev| seconds_between(prev, ts));
        previous = Some(ts);
    }
    records
}

/// Run the full correlation stage.
///
/// 1. Expand samples × zones
/// 2. Stable sort by timestamp
/// 3. Compute global gaps
/// 4. Keep records with no gap or a gap `<= max_diff_seconds`, re-sorted by timestamp
/// 5. Default missing labels to `"safe"`
///
/// # Errors
/// [`ZoneMatchError::MissingPrerequisite`] when either input is empty.
pub fn correlate(
    samples: &[LocationSample],
    zones: &[ZoneDefinition],
    config: &CorrelationConfig,
) -> Result<Vec<CorrelatedRecord>> {
    if samples.is_empty() {
        return Err(ZoneMatchError::MissingPrerequisite {
            stage: Stage::Correlation,
            prerequisite: "location samples",
        });
    }
    if zones.is_empty() {
        return Err(ZoneMatchError::MissingPrerequisite {
            stage: Stage::Correlation,
            prerequisite: "zone definitions",
        });
    }

    let mut expanded = expand(samples, zones);
    let expanded_count = expanded.len();
    expanded.sort_by_key(|r| r.sample.timestamp);

    let mut kept: Vec<CorrelatedRecord> = with_diffs(expanded)
        .into_iter()
        .filter(|r| r.diff_seconds.is_none_or(|d| d <= config.max_diff_seconds))
        .collect();
    kept.sort_by_key(|r| r.sample.timestamp);

    for record in &mut kept {
        if record.label.is_none() {
            record.label = Some(DEFAULT_ZONE_LABEL.to_string());
        }
    }

    info!(
        "Correlated {} samples x {} zones: {} expanded, {} kept (max gap {}s)",
        samples.len(),
        zones.len(),
        expanded_count,
        kept.len(),
        config.max_diff_seconds
    );
    Ok(kept)
}
