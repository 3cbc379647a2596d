//! Stage orchestration.
//!
//! Each stage takes its predecessor's output by reference and returns a new
//! collection. The run fails fast: the first error is returned with the
//! stage it came from, and nothing is persisted unless every stage succeeded.

use log::info;

use crate::io;
use crate::{
    AnalyzedRecord, Config, CorrelationConfig, DwellStatistics, LocationSample, Result, Stage,
    ZoneDefinition, ZoneStatistics, aggregate, correlate, dwell_statistics, prepare_samples,
};

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Records that survived gap filtering
    pub correlated_count: usize,
    pub analyzed: Vec<AnalyzedRecord>,
    pub patterns: Vec<ZoneStatistics>,
    pub dwell: Vec<DwellStatistics>,
}

/// Run correlation, analysis and aggregation on in-memory inputs.
pub fn run_pipeline(
    samples: Vec<LocationSample>,
    zones: &[ZoneDefinition],
    config: &CorrelationConfig,
) -> Result<PipelineOutput> {
    let samples = prepare_samples(samples);

    let correlated = correlate(&samples, zones, config)
        .map_err(|e| e.in_stage(Stage::Correlation, format!("{} samples", samples.len())))?;

    #[cfg(feature = "parallel")]
    let analyzed = crate::analysis::analyze_parallel(&correlated)?;
    #[cfg(not(feature = "parallel"))]
    let analyzed = crate::analysis::analyze(&correlated)?;

    let patterns = aggregate(&analyzed).map_err(|e| {
        e.in_stage(
            Stage::Aggregation,
            format!("{} analysed records", analyzed.len()),
        )
    })?;
    let dwell = dwell_statistics(&correlated);

    info!(
        "Pipeline complete: {} records across {} zone labels",
        analyzed.len(),
        patterns.len()
    );

    Ok(PipelineOutput {
        correlated_count: correlated.len(),
        analyzed,
        patterns,
        dwell,
    })
}

/// Load inputs from the configured CSV files, run the pipeline and write results.
pub fn run_files(config: &Config) -> Result<PipelineOutput> {
    config.validate()?;

    info!("Loading zones from {}", config.zones_path.display());
    let zones = io::read_zones_path(&config.zones_path).map_err(|e| {
        e.in_stage(Stage::Loading, config.zones_path.display().to_string())
    })?;

    info!("Loading samples from {}", config.samples_path.display());
    let samples = io::read_samples_path(&config.samples_path, config.default_z_coordinate)
        .map_err(|e| e.in_stage(Stage::Loading, config.samples_path.display().to_string()))?;

    let output = run_pipeline(samples, &zones, &config.correlation())?;

    io::write_outputs(&config.output_dir, &output).map_err(|e| {
        e.in_stage(Stage::Persistence, config.output_dir.display().to_string())
    })?;
    info!("Results saved to {}", config.output_dir.display());

    Ok(output)
}
