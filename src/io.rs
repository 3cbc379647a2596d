//! CSV loading and persistence.
//!
//! Zone files carry `family_type`, `comment` and per-vertex columns
//! `X1,Y1,Z1 … X4,Y4,Z4`. Sample files carry `timestamp`, `location_X`,
//! `location_Y` and optionally `location_Z`. Columns are matched by header
//! name, so their order does not matter.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use csv::StringRecord;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    AnalyzedRecord, DwellStatistics, LocationSample, OptionExt, Point3D, PipelineOutput, Result,
    ZONE_VERTEX_COUNT, ZoneDefinition, ZoneMatchError, ZoneStatistics, prepare_samples,
};

/// Output file names inside the output directory.
pub const DISTANCE_ANALYSIS_FILE: &str = "distance_analysis.csv";
pub const WORKSPACE_PATTERNS_FILE: &str = "workspace_patterns.csv";
pub const WORKSPACE_STATISTICS_FILE: &str = "workspace_statistics.csv";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Cell values read as missing, in addition to the empty string.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ============================================================================
// Reading
// ============================================================================

/// Header lookup that reports absent columns as schema errors.
struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        Self {
            headers: headers.iter().map(str::trim).collect(),
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.find(name).ok_or_else(|| ZoneMatchError::Schema {
            row: 0,
            field: name.to_string(),
            reason: "column not found in header".to_string(),
        })
    }
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> Option<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !NA_TOKENS.contains(s))
}

fn parse_f64(record: &StringRecord, idx: usize, row: usize, name: &str) -> Result<f64> {
    let raw = field(record, idx).ok_or_missing_field(row, name)?;
    raw.parse::<f64>().map_err(|e| ZoneMatchError::Schema {
        row,
        field: name.to_string(),
        reason: format!("'{}' is not a number ({})", raw, e),
    })
}

/// Parse an RTLS timestamp, ignoring any `@` characters.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = raw.replace('@', "");
    let cleaned = cleaned.trim();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(cleaned)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Read zone definitions.
pub fn read_zones<R: Read>(reader: R) -> Result<Vec<ZoneDefinition>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::new(rdr.headers()?);

    let family_idx = columns.require("family_type")?;
    let comment_idx = columns.require("comment")?;
    let mut vertex_idx = [[0usize; 3]; ZONE_VERTEX_COUNT];
    for (v, slots) in vertex_idx.iter_mut().enumerate() {
        for (slot, axis) in slots.iter_mut().zip(["X", "Y", "Z"]) {
            *slot = columns.require(&format!("{}{}", axis, v + 1))?;
        }
    }

    let mut zones = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let mut vertices = [Point3D::default(); ZONE_VERTEX_COUNT];
        for (v, (vertex, idx)) in vertices.iter_mut().zip(&vertex_idx).enumerate() {
            let n = v + 1;
            *vertex = Point3D::new(
                parse_f64(&record, idx[0], row, &format!("X{}", n))?,
                parse_f64(&record, idx[1], row, &format!("Y{}", n))?,
                parse_f64(&record, idx[2], row, &format!("Z{}", n))?,
            );
            if !vertex.is_finite() {
                return Err(ZoneMatchError::Schema {
                    row,
                    field: format!("vertex {}", n),
                    reason: format!("non-finite coordinate {:?}", vertex.to_array()),
                });
            }
        }

        zones.push(ZoneDefinition {
            family_type: field(&record, family_idx).unwrap_or_default().to_string(),
            comment: field(&record, comment_idx).map(str::to_string),
            vertices,
        });
    }

    debug!("Read {} zones", zones.len());
    Ok(zones)
}

/// Read location samples.
///
/// Rows with an empty or NA timestamp or X/Y are skipped, as are rows whose
/// coordinates parse to infinity. Samples without a `location_Z` value get
/// `default_z`. The result is deduplicated by timestamp and sorted.
pub fn read_samples<R: Read>(reader: R, default_z: f64) -> Result<Vec<LocationSample>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::new(rdr.headers()?);

    let ts_idx = columns.require("timestamp")?;
    let x_idx = columns.require("location_X")?;
    let y_idx = columns.require("location_Y")?;
    let z_idx = columns.find("location_Z");

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let (Some(raw_ts), Some(_), Some(_)) = (
            field(&record, ts_idx),
            field(&record, x_idx),
            field(&record, y_idx),
        ) else {
            skipped += 1;
            continue;
        };

        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| ZoneMatchError::Schema {
            row,
            field: "timestamp".to_string(),
            reason: format!("unrecognised timestamp '{}'", raw_ts),
        })?;
        let x = parse_f64(&record, x_idx, row, "location_X")?;
        let y = parse_f64(&record, y_idx, row, "location_Y")?;
        let z = match z_idx.and_then(|idx| field(&record, idx).map(|_| idx)) {
            Some(idx) => parse_f64(&record, idx, row, "location_Z")?,
            None => default_z,
        };

        let sample = LocationSample::new(timestamp, x, y, z);
        if !sample.location.is_finite() {
            skipped += 1;
            continue;
        }
        samples.push(sample);
    }

    if skipped > 0 {
        warn!("Skipped {} sample rows with empty or non-finite fields", skipped);
    }
    let samples = prepare_samples(samples);
    debug!("Read {} samples", samples.len());
    Ok(samples)
}

pub fn read_zones_path(path: &Path) -> Result<Vec<ZoneDefinition>> {
    read_zones(File::open(path)?)
}

pub fn read_samples_path(path: &Path, default_z: f64) -> Result<Vec<LocationSample>> {
    read_samples(File::open(path)?, default_z)
}

// ============================================================================
// Writing
// ============================================================================

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

fn analyzed_header() -> Vec<String> {
    let mut header: Vec<String> = [
        "timestamp",
        "location_X",
        "location_Y",
        "location_Z",
        "family_type",
        "comment",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for v in 1..=ZONE_VERTEX_COUNT {
        header.extend(["X", "Y", "Z"].iter().map(|axis| format!("{}{}", axis, v)));
    }
    header.push("diff_seconds".to_string());
    header.push("in_workspace".to_string());
    for e in 1..=ZONE_VERTEX_COUNT {
        header.push(format!("distance_{}", e));
        header.extend(["x", "y", "z"].iter().map(|axis| format!("nearest_point_{}_{}", e, axis)));
    }
    header
}

fn analyzed_row(r: &AnalyzedRecord) -> Vec<String> {
    let sample = &r.record.sample;
    let zone = &r.record.zone;

    let mut row = vec![
        format_timestamp(sample.timestamp),
        sample.location.x.to_string(),
        sample.location.y.to_string(),
        sample.location.z.to_string(),
        zone.family_type.clone(),
        r.label().to_string(),
    ];
    for v in &zone.vertices {
        row.extend(v.to_array().iter().map(f64::to_string));
    }
    row.push(r.record.diff_seconds.map(|d| d.to_string()).unwrap_or_default());
    row.push(r.in_workspace.to_string());
    for edge in &r.edges {
        row.push(edge.distance.to_string());
        row.extend(edge.nearest_point.to_array().iter().map(f64::to_string));
    }
    row
}

/// Write one row per analysed record.
pub fn write_analyzed<W: Write>(writer: W, records: &[AnalyzedRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(analyzed_header())?;
    for r in records {
        wtr.write_record(analyzed_row(r))?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct PatternRow<'a> {
    comment: &'a str,
    in_workspace_count: usize,
    in_workspace_sum: usize,
    in_workspace_mean: f64,
    diff_seconds_sum: f64,
    diff_seconds_mean: Option<f64>,
}

/// Write one row per zone label.
pub fn write_patterns<W: Write>(writer: W, patterns: &[ZoneStatistics]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for p in patterns {
        wtr.serialize(PatternRow {
            comment: &p.label,
            in_workspace_count: p.count,
            in_workspace_sum: p.membership_sum,
            in_workspace_mean: p.membership_mean,
            diff_seconds_sum: p.diff_sum,
            diff_seconds_mean: p.diff_mean,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct DwellRow<'a> {
    comment: &'a str,
    time_spent: f64,
    records_number: usize,
}

pub fn write_dwell_statistics<W: Write>(writer: W, dwell: &[DwellStatistics]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for d in dwell {
        wtr.serialize(DwellRow {
            comment: &d.label,
            time_spent: d.time_spent,
            records_number: d.records_number,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write all three result tables into `output_dir`, creating it if needed.
pub fn write_outputs(output_dir: &Path, output: &PipelineOutput) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    write_analyzed(
        File::create(output_dir.join(DISTANCE_ANALYSIS_FILE))?,
        &output.analyzed,
    )?;
    write_patterns(
        File::create(output_dir.join(WORKSPACE_PATTERNS_FILE))?,
        &output.patterns,
    )?;
    write_dwell_statistics(
        File::create(output_dir.join(WORKSPACE_STATISTICS_FILE))?,
        &output.dwell,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzed_header_width() {
        // 6 identity columns, 12 vertex columns, diff, membership, 4 x (distance + 3)
        assert_eq!(analyzed_header().len(), 6 + 12 + 2 + 16);
    }
}
