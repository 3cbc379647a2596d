//! Per-record zone analysis: footprint membership and edge projections.
//!
//! Records are independent of each other, so the parallel variant simply
//! fans the same per-record function out over rayon and collects in order.

use log::debug;

use crate::membership::zone_contains;
use crate::projection::{EdgeProjection, project};
use crate::{AnalyzedRecord, CorrelatedRecord, Result, Stage, ZoneMatchError};

/// Analyse a single correlated record.
pub fn analyze_record(record: &CorrelatedRecord) -> Result<AnalyzedRecord> {
    let location = record.sample.location;
    let in_workspace = zone_contains(&record.zone, location.xy());

    let mut edges = [EdgeProjection::default(); crate::ZONE_VERTEX_COUNT];
    for (slot, (start, end)) in edges.iter_mut().zip(record.zone.edges()) {
        *slot = project(location, start, end)?;
    }

    Ok(AnalyzedRecord {
        record: record.clone(),
        in_workspace,
        edges,
    })
}

fn record_context(index: usize, record: &CorrelatedRecord) -> String {
    format!(
        "record {} at {}, zone '{}'",
        index,
        record.sample.timestamp,
        record.label()
    )
}

fn ensure_input(records: &[CorrelatedRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(ZoneMatchError::MissingPrerequisite {
            stage: Stage::Analysis,
            prerequisite: "correlated records",
        });
    }
    Ok(())
}

/// Analyse all records sequentially, preserving order.
///
/// Stops at the first failing record; the error names its index, timestamp and zone.
pub fn analyze(records: &[CorrelatedRecord]) -> Result<Vec<AnalyzedRecord>> {
    ensure_input(records)?;

    let analyzed = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            analyze_record(r).map_err(|e| e.in_stage(Stage::Analysis, record_context(i, r)))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Analysed {} records", analyzed.len());
    Ok(analyzed)
}

/// Analyse all records in parallel, preserving order.
///
/// Fails with the same error as [`analyze`]: when several records fail, the
/// lowest index is reported regardless of scheduling.
#[cfg(feature = "parallel")]
pub fn analyze_parallel(records: &[CorrelatedRecord]) -> Result<Vec<AnalyzedRecord>> {
    use rayon::prelude::*;

    ensure_input(records)?;

    let results: Vec<Result<AnalyzedRecord>> = records.par_iter().map(analyze_record).collect();

    // Sequential collect stops at the first failure in input order
    let analyzed = results
        .into_iter()
        .zip(records)
        .enumerate()
        .map(|(i, (result, r))| {
            result.map_err(|e| e.in_stage(Stage::Analysis, record_context(i, r)))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Analysed {} records (parallel)", analyzed.len());
    Ok(analyzed)
}
