//! # Zone Matcher
//!
//! Correlates RTLS (real-time location system) position samples with BIM
//! zone geometry.
//!
//! This library provides:
//! - Temporal correlation of samples against every zone (cross join + gap filter)
//! - 2D point-in-zone membership on the XY footprint
//! - Clamped point-to-edge distances with nearest points for all four zone edges
//! - Per-zone occupancy patterns and dwell statistics
//! - CSV loading and persistence of inputs and results
//!
//! ## Features
//!
//! - **`parallel`** - Analyse correlated records in parallel with rayon
//! - **`synthetic`** - Synthetic zone/sample generator for benchmarks and stress tests
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use zonematch::{CorrelationConfig, LocationSample, Point3D, ZoneDefinition, run_pipeline};
//!
//! let zone = ZoneDefinition::new(
//!     "Floor",
//!     Some("workbench"),
//!     [
//!         Point3D::new(0.0, 0.0, 0.0),
//!         Point3D::new(4.0, 0.0, 0.0),
//!         Point3D::new(4.0, 4.0, 0.0),
//!         Point3D::new(0.0, 4.0, 0.0),
//!     ],
//! );
//!
//! let t0 = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let samples = vec![
//!     LocationSample::new(t0, 1.0, 1.0, 0.0),
//!     LocationSample::new(t0 + chrono::Duration::seconds(3), 2.0, 2.0, 0.0),
//! ];
//!
//! let output = run_pipeline(samples, &[zone], &CorrelationConfig::default()).unwrap();
//! assert_eq!(output.patterns[0].count, 2);
//! assert!(output.analyzed.iter().all(|r| r.in_workspace));
//! ```

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, Stage, ZoneMatchError};

// Configuration
pub mod config;
pub use config::{Config, CorrelationConfig};

// 3D vector primitives
pub mod vector;

// Point-to-segment projection
pub mod projection;
pub use projection::{EdgeProjection, project};

// Point-in-polygon membership and zone preflight checks
pub mod membership;
pub use membership::{ZoneIssue, contains, validate_zone};

// Cross join, gap computation and filtering
pub mod correlation;
pub use correlation::{correlate, expand, prepare_samples};

// Per-record membership and edge distances
pub mod analysis;
#[cfg(feature = "parallel")]
pub use analysis::analyze_parallel;
pub use analysis::{analyze, analyze_record};

// Per-zone aggregation
pub mod patterns;
pub use patterns::{DwellStatistics, ZoneStatistics, aggregate, dwell_statistics};

// Stage orchestration
pub mod pipeline;
pub use pipeline::{PipelineOutput, run_files, run_pipeline};

// CSV input/output
pub mod io;

// Synthetic data for benchmarks and stress tests
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// Number of vertices in a zone footprint.
pub const ZONE_VERTEX_COUNT: usize = 4;

/// Label assigned to records whose zone carries no comment.
pub const DEFAULT_ZONE_LABEL: &str = "safe";

/// A point in building coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Components as a vector.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Projection onto the XY plane.
    pub fn xy(self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A labelled quadrilateral zone from the building model.
///
/// Edge `i` (0-based) runs from `vertices[i]` to `vertices[(i + 1) % 4]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    /// Family/category of the BIM element
    pub family_type: String,
    /// Free-text label; `None` falls back to [`DEFAULT_ZONE_LABEL`]
    pub comment: Option<String>,
    /// Ordered footprint vertices
    pub vertices: [Point3D; ZONE_VERTEX_COUNT],
}

impl ZoneDefinition {
    pub fn new(
        family_type: impl Into<String>,
        comment: Option<&str>,
        vertices: [Point3D; ZONE_VERTEX_COUNT],
    ) -> Self {
        Self {
            family_type: family_type.into(),
            comment: comment.map(str::to_string),
            vertices,
        }
    }

    /// Endpoints of edge `i` (0-based, wraps modulo 4).
    pub fn edge(&self, i: usize) -> (Point3D, Point3D) {
        let i = i % ZONE_VERTEX_COUNT;
        (self.vertices[i], self.vertices[(i + 1) % ZONE_VERTEX_COUNT])
    }

    /// All four edges in boundary order.
    pub fn edges(&self) -> [(Point3D, Point3D); ZONE_VERTEX_COUNT] {
        std::array::from_fn(|i| self.edge(i))
    }

    /// XY projection of the vertices.
    pub fn footprint(&self) -> [(f64, f64); ZONE_VERTEX_COUNT] {
        self.vertices.map(Point3D::xy)
    }

    /// Grouping label with the default applied.
    pub fn label(&self) -> &str {
        self.comment.as_deref().unwrap_or(DEFAULT_ZONE_LABEL)
    }
}

/// A single timestamped RTLS position reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub timestamp: NaiveDateTime,
    pub location: Point3D,
}

impl LocationSample {
    pub fn new(timestamp: NaiveDateTime, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp,
            location: Point3D::new(x, y, z),
        }
    }
}

/// One sample paired with one zone.
///
/// Zones are shared between all records they were expanded into.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatedRecord {
    pub sample: LocationSample,
    pub zone: Arc<ZoneDefinition>,
    /// Zone label; always populated once correlation completes
    pub label: Option<String>,
    /// Seconds since the preceding record in global timestamp order
    pub diff_seconds: Option<f64>,
}

impl CorrelatedRecord {
    pub fn new(sample: LocationSample, zone: Arc<ZoneDefinition>) -> Self {
        let label = zone.comment.clone();
        Self {
            sample,
            zone,
            label,
            diff_seconds: None,
        }
    }

    /// Grouping label with the default applied.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_ZONE_LABEL)
    }
}

/// A correlated record with membership and per-edge projections.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedRecord {
    pub record: CorrelatedRecord,
    /// Whether the sample lies strictly inside the zone footprint
    pub in_workspace: bool,
    /// Projection onto edge `i` (0-based, same order as [`ZoneDefinition::edges`])
    pub edges: [EdgeProjection; ZONE_VERTEX_COUNT],
}

impl AnalyzedRecord {
    pub fn label(&self) -> &str {
        self.record.label()
    }

    /// Distance to the closest zone edge.
    pub fn min_edge_distance(&self) -> f64 {
        self.edges
            .iter()
            .map(|e| e.distance)
            .fold(f64::INFINITY, f64::min)
    }
}
