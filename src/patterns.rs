//! Per-zone aggregation of analysed records.
//!
//! Groups are keyed by exact label and emitted in ascending label order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AnalyzedRecord, CorrelatedRecord, Result, Stage, ZoneMatchError};

/// Occupancy pattern for one zone label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub label: String,
    /// Number of records with this label
    pub count: usize,
    /// Records whose sample was inside the zone
    pub membership_sum: usize,
    /// `membership_sum / count`
    pub membership_mean: f64,
    /// Sum of non-null gaps in seconds
    pub diff_sum: f64,
    /// Mean of non-null gaps; `None` when every gap is null
    pub diff_mean: Option<f64>,
}

/// Time spent and record count per zone label, over correlated records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DwellStatistics {
    pub label: String,
    pub time_spent: f64,
    pub records_number: usize,
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    members: usize,
    diff_sum: f64,
    diff_count: usize,
}

impl Accumulator {
    fn push(&mut self, in_workspace: bool, diff: Option<f64>) {
        self.count += 1;
        if in_workspace {
            self.members += 1;
        }
        if let Some(d) = diff {
            self.diff_sum += d;
            self.diff_count += 1;
        }
    }
}

/// Aggregate analysed records by zone label.
///
/// # Errors
/// [`ZoneMatchError::MissingPrerequisite`] when `records` is empty.
pub fn aggregate(records: &[AnalyzedRecord]) -> Result<Vec<ZoneStatistics>> {
    if records.is_empty() {
        return Err(ZoneMatchError::MissingPrerequisite {
            stage: Stage::Aggregation,
            prerequisite: "analysed records",
        });
    }

    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for r in records {
        groups
            .entry(r.label())
            .or_default()
            .push(r.in_workspace, r.record.diff_seconds);
    }

    Ok(groups
        .into_iter()
        .map(|(label, acc)| ZoneStatistics {
            label: label.to_string(),
            count: acc.count,
            membership_sum: acc.members,
            membership_mean: acc.members as f64 / acc.count as f64,
            diff_sum: acc.diff_sum,
            diff_mean: (acc.diff_count > 0).then(|| acc.diff_sum / acc.diff_count as f64),
        })
        .collect())
}

/// Time spent (summed gaps) and record count per label.
pub fn dwell_statistics(records: &[CorrelatedRecord]) -> Vec<DwellStatistics> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(r.label()).or_insert((0.0, 0));
        entry.0 += r.diff_seconds.unwrap_or(0.0);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(label, (time_spent, records_number))| DwellStatistics {
            label: label.to_string(),
            time_spent,
            records_number,
        })
        .collect()
}
