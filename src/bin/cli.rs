//! zonematch CLI - runs the RTLS/BIM zone analysis over CSV files
//!
//! Usage:
//!   zonematch-cli analyze [--config <file>] [--zones <csv>] [--samples <csv>] [--output <dir>]
//!   zonematch-cli validate <zones.csv> [--tolerance <metres>]
//!
//! `analyze` writes distance_analysis.csv, workspace_patterns.csv and
//! workspace_statistics.csv into the output directory. `validate` reports
//! degenerate, non-planar and self-intersecting zones without analysing.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use zonematch::{Config, PipelineOutput, ZoneIssue, io, run_files, validate_zone};

#[derive(Parser)]
#[command(name = "zonematch-cli")]
#[command(about = "Correlate RTLS samples with BIM zones", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run correlation, zone analysis and aggregation
    Analyze {
        /// JSON configuration file (flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Data directory holding the default input files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Zone definitions CSV
        #[arg(short, long)]
        zones: Option<PathBuf>,

        /// RTLS samples CSV
        #[arg(short, long)]
        samples: Option<PathBuf>,

        /// Output directory for result CSVs
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum gap between consecutive records in seconds
        #[arg(long)]
        max_diff: Option<f64>,

        /// Elevation for samples without location_Z
        #[arg(long)]
        default_z: Option<f64>,
    },

    /// Check zone geometry without running the analysis
    Validate {
        /// Zone definitions CSV
        zones: PathBuf,

        /// Allowed distance of the fourth vertex from the zone plane
        #[arg(long, default_value = "0.01")]
        tolerance: f64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let result = match cli.command {
        Commands::Analyze {
            config,
            data_dir,
            zones,
            samples,
            output,
            max_diff,
            default_z,
        } => build_config(config, data_dir, zones, samples, output, max_diff, default_z)
            .and_then(|config| run_analyze(&config)),
        Commands::Validate { zones, tolerance } => run_validate(&zones, tolerance),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_config(
    file: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    zones: Option<PathBuf>,
    samples: Option<PathBuf>,
    output: Option<PathBuf>,
    max_diff: Option<f64>,
    default_z: Option<f64>,
) -> zonematch::Result<Config> {
    let mut config = match (file, data_dir) {
        (Some(path), _) => Config::from_json_file(&path)?,
        (None, Some(dir)) => Config::with_data_dir(dir),
        (None, None) => Config::default(),
    };

    if let Some(path) = zones {
        config.zones_path = path;
    }
    if let Some(path) = samples {
        config.samples_path = path;
    }
    if let Some(dir) = output {
        config.output_dir = dir;
    }
    if let Some(v) = max_diff {
        config.max_diff_seconds = v;
    }
    if let Some(v) = default_z {
        config.default_z_coordinate = v;
    }

    config.validate()?;
    config.ensure_dirs()?;
    Ok(config)
}

fn run_analyze(config: &Config) -> zonematch::Result<()> {
    println!("\n{}", "=".repeat(60));
    println!("Zone analysis");
    println!("{}", "=".repeat(60));
    println!("  zones:    {}", config.zones_path.display());
    println!("  samples:  {}", config.samples_path.display());
    println!("  max gap:  {}s", config.max_diff_seconds);

    let output = run_files(config)?;
    print_summary(&output);
    println!("\nResults saved to: {}", config.output_dir.display());
    Ok(())
}

fn print_summary(output: &PipelineOutput) {
    println!("\n{} correlated records kept", output.correlated_count);
    println!(
        "\n  {:<24} {:>8} {:>8} {:>8} {:>12}",
        "zone", "count", "inside", "rate", "dwell (s)"
    );
    for p in &output.patterns {
        println!(
            "  {:<24} {:>8} {:>8} {:>8.3} {:>12.1}",
            p.label, p.count, p.membership_sum, p.membership_mean, p.diff_sum
        );
    }
}

fn run_validate(zones_path: &PathBuf, tolerance: f64) -> zonematch::Result<()> {
    let zones = io::read_zones_path(zones_path)?;
    println!("Checking {} zones from {}", zones.len(), zones_path.display());

    let mut problems = 0;
    for (i, zone) in zones.iter().enumerate() {
        let issues = validate_zone(zone, tolerance);
        if issues.is_empty() {
            continue;
        }
        problems += 1;
        println!("  [ERR] zone {} ({})", i + 1, zone.label());
        for issue in issues {
            match issue {
                ZoneIssue::DegenerateEdge { edge } => {
                    println!("        edge {} has zero length", edge + 1)
                }
                ZoneIssue::NonCoplanar { deviation } => {
                    println!("        vertex 4 is {:.4} off the zone plane", deviation)
                }
                ZoneIssue::SelfIntersecting { first, second } => {
                    println!("        edges {} and {} cross", first + 1, second + 1)
                }
            }
        }
    }

    if problems == 0 {
        println!("  [OK] all zones valid");
    } else {
        println!("\n{} of {} zones have problems", problems, zones.len());
    }
    Ok(())
}
