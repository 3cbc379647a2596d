//! Unified error handling for the zone correlation pipeline.
//!
//! Every failure is surfaced to the caller. Nothing is retried: all stages
//! are pure functions of their inputs, so a retry would fail identically.

use std::fmt;

use thiserror::Error;

use crate::Point3D;

/// Pipeline stage, used to attribute errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Correlation,
    Analysis,
    Aggregation,
    Persistence,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::Correlation => "correlation",
            Stage::Analysis => "analysis",
            Stage::Aggregation => "aggregation",
            Stage::Persistence => "persistence",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ZoneMatchError {
    /// `unit` was asked to normalise a zero-length vector.
    #[error("cannot normalise a zero-length vector")]
    DegenerateVector,

    /// A zone edge whose endpoints coincide.
    #[error("zone edge from {start:?} to {end:?} has zero length")]
    DegenerateSegment { start: Point3D, end: Point3D },

    /// A stage was invoked before its input stage produced any data.
    #[error("{stage} stage requires {prerequisite}, but none were provided")]
    MissingPrerequisite {
        stage: Stage,
        prerequisite: &'static str,
    },

    /// A collaborator-supplied record is missing a field or has the wrong type.
    #[error("schema error at row {row}, field '{field}': {reason}")]
    Schema {
        row: usize,
        field: String,
        reason: String,
    },

    /// Context wrapper naming the failing stage and record.
    #[error("{stage} stage failed ({context}): {source}")]
    Stage {
        stage: Stage,
        context: String,
        #[source]
        source: Box<ZoneMatchError>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ZoneMatchError {
    /// Attach stage context. Errors that already carry a stage are passed through.
    pub fn in_stage(self, stage: Stage, context: impl Into<String>) -> Self {
        match self {
            err @ ZoneMatchError::Stage { .. } => err,
            other => ZoneMatchError::Stage {
                stage,
                context: context.into(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, stripped of stage context.
    pub fn root_cause(&self) -> &ZoneMatchError {
        match self {
            ZoneMatchError::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The stage this error was attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ZoneMatchError::Stage { stage, .. } => Some(*stage),
            ZoneMatchError::MissingPrerequisite { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZoneMatchError>;

/// Convert missing values into schema errors.
pub trait OptionExt<T> {
    fn ok_or_missing_field(self, row: usize, field: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_missing_field(self, row: usize, field: &str) -> Result<T> {
        self.ok_or_else(|| ZoneMatchError::Schema {
            row,
            field: field.to_string(),
            reason: "value is missing".to_string(),
        })
    }
}
