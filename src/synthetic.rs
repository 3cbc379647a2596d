//! Synthetic zone and RTLS data generator for stress testing and benchmarking.
//!
//! Lays out a grid of rectangular zones and walks a single tag through the
//! floor with jittered sampling intervals. A configurable share of intervals
//! are long gaps, which the correlator is expected to filter.
//!
//! Feature-gated behind `synthetic`; not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use zonematch::synthetic::SyntheticScenario;
//!
//! let scenario = SyntheticScenario {
//!     zone_rows: 2,
//!     zone_cols: 3,
//!     sample_count: 500,
//!     ..SyntheticScenario::default()
//! };
//!
//! let dataset = scenario.generate();
//! assert_eq!(dataset.zones.len(), 6);
//! assert_eq!(dataset.samples.len(), 500);
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{LocationSample, Point3D, ZoneDefinition};

/// Parameters for a synthetic floor.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    /// Zones along Y.
    pub zone_rows: usize,
    /// Zones along X.
    pub zone_cols: usize,
    /// Side length of each square zone in metres.
    pub zone_size: f64,
    /// Corridor width between zones in metres.
    pub zone_gap: f64,
    /// Number of samples to generate.
    pub sample_count: usize,
    /// Mean sampling interval in seconds.
    pub mean_interval_seconds: f64,
    /// Probability that an interval is a long gap.
    pub gap_probability: f64,
    /// Length of a long gap in seconds.
    pub gap_seconds: f64,
    /// Maximum step per sample along each axis in metres.
    pub max_step: f64,
    /// Elevation of the floor.
    pub floor_z: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for SyntheticScenario {
    fn default() -> Self {
        Self {
            zone_rows: 3,
            zone_cols: 3,
            zone_size: 5.0,
            zone_gap: 1.5,
            sample_count: 1_000,
            mean_interval_seconds: 1.0,
            gap_probability: 0.02,
            gap_seconds: 30.0,
            max_step: 0.8,
            floor_z: 0.0,
            seed: 42,
        }
    }
}

/// A generated floor and tag trace.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub zones: Vec<ZoneDefinition>,
    /// Sorted, unique timestamps
    pub samples: Vec<LocationSample>,
    /// Number of intervals longer than the mean interval by design
    pub gap_count: usize,
}

impl SyntheticScenario {
    fn floor_extent(&self) -> (f64, f64) {
        let pitch = self.zone_size + self.zone_gap;
        (
            self.zone_cols as f64 * pitch + self.zone_gap,
            self.zone_rows as f64 * pitch + self.zone_gap,
        )
    }

    fn generate_zones(&self) -> Vec<ZoneDefinition> {
        let pitch = self.zone_size + self.zone_gap;
        let z = self.floor_z;
        let mut zones = Vec::with_capacity(self.zone_rows * self.zone_cols);

        for row in 0..self.zone_rows {
            for col in 0..self.zone_cols {
                let x0 = self.zone_gap + col as f64 * pitch;
                let y0 = self.zone_gap + row as f64 * pitch;
                let x1 = x0 + self.zone_size;
                let y1 = y0 + self.zone_size;
                let label = format!("zone_r{}c{}", row, col);
                zones.push(ZoneDefinition::new(
                    "Generic Models: Workspace",
                    Some(label.as_str()),
                    [
                        Point3D::new(x0, y0, z),
                        Point3D::new(x1, y0, z),
                        Point3D::new(x1, y1, z),
                        Point3D::new(x0, y1, z),
                    ],
                ));
            }
        }
        zones
    }

    /// Generate a complete synthetic dataset from this scenario.
    pub fn generate(&self) -> SyntheticDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let zones = self.generate_zones();
        let (width, height) = self.floor_extent();

        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap_or(NaiveDateTime::MIN);

        let mut samples = Vec::with_capacity(self.sample_count);
        let mut gap_count = 0;
        let mut t = start;
        let mut x = width / 2.0;
        let mut y = height / 2.0;

        for i in 0..self.sample_count {
            if i > 0 {
                let seconds = if rng.gen_bool(self.gap_probability.clamp(0.0, 1.0)) {
                    gap_count += 1;
                    self.gap_seconds
                } else {
                    // Jitter within +-50% of the mean, never below 1ms
                    let jitter: f64 = rng.gen_range(0.5..1.5);
                    (self.mean_interval_seconds * jitter).max(0.001)
                };
                t += Duration::microseconds((seconds * 1_000_000.0) as i64);

                x = (x + rng.gen_range(-self.max_step..=self.max_step)).clamp(0.0, width);
                y = (y + rng.gen_range(-self.max_step..=self.max_step)).clamp(0.0, height);
            }
            samples.push(LocationSample::new(t, x, y, self.floor_z));
        }

        SyntheticDataset {
            zones,
            samples,
            gap_count,
        }
    }
}
