//! Error types for the pipeline.

use thiserror::Error;
use woi_data::DataError;
use woi_metrics::MetricsError;
use woi_output::{ExportError, ReportError};

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while processing a dataset or a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or validation failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Metric computation failed
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Writing an artifact failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Writing the run report failed
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether the dataset should be reported as skipped rather than failed.
    pub const fn is_schema(&self) -> bool {
        match self {
            Self::Data(e) => e.is_schema(),
            Self::Metrics(e) => e.is_schema(),
            _ => false,
        }
    }

    /// Required columns reported missing, if that is what went wrong.
    pub fn missing_columns(&self) -> Vec<String> {
        match self {
            Self::Data(DataError::MissingColumns(columns))
            | Self::Metrics(MetricsError::MissingColumns { columns, .. }) => columns.clone(),
            _ => Vec::new(),
        }
    }
}
