//! Configuration for loading, correlation and persistence.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Result, ZoneMatchError};

/// Settings consumed by the temporal correlator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Records whose gap from the preceding record exceeds this are dropped.
    /// Default: 5.0 seconds
    pub max_diff_seconds: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            max_diff_seconds: 5.0,
        }
    }
}

/// Full application configuration.
///
/// Every field has a default, so a JSON file only needs to name overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory for input data
    pub data_dir: PathBuf,
    /// Zone (BIM model) CSV
    pub zones_path: PathBuf,
    /// RTLS sample CSV
    pub samples_path: PathBuf,
    /// Directory results are written into
    pub output_dir: PathBuf,
    /// Maximum gap between consecutive records, in seconds. Default: 5.0
    pub max_diff_seconds: f64,
    /// Elevation given to samples without a `location_Z` column. Default: 0.0
    pub default_z_coordinate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_data_dir("data")
    }
}

impl Config {
    /// Default layout rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            zones_path: data_dir.join("model_zone_detection5.csv"),
            samples_path: data_dir.join("Experiment8_zone_detection_pattern6.csv"),
            output_dir: data_dir.join("output"),
            data_dir,
            max_diff_seconds: CorrelationConfig::default().max_diff_seconds,
            default_z_coordinate: 0.0,
        }
    }

    /// Load a configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_diff_seconds.is_nan() || self.max_diff_seconds < 0.0 {
            return Err(ZoneMatchError::Config(format!(
                "max_diff_seconds must be a non-negative number, got {}",
                self.max_diff_seconds
            )));
        }
        if !self.default_z_coordinate.is_finite() {
            return Err(ZoneMatchError::Config(format!(
                "default_z_coordinate must be finite, got {}",
                self.default_z_coordinate
            )));
        }
        Ok(())
    }

    pub fn correlation(&self) -> CorrelationConfig {
        CorrelationConfig {
            max_diff_seconds: self.max_diff_seconds,
        }
    }

    /// Create the data and output directories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}
