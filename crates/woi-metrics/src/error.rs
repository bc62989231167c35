//! Error types for metric computation.

use thiserror::Error;

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors raised while computing metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Required input columns are absent
    #[error("{metric}: missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        /// Metric that rejected the table
        metric: String,
        /// Columns that were not found
        columns: Vec<String>,
    },

    /// A column has a type the metric cannot work with
    #[error("Column {column} must be numeric, found {dtype}")]
    NonNumeric {
        /// Column name
        column: String,
        /// Observed polars data type
        dtype: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl MetricsError {
    /// Whether the error describes the table's shape rather than its values.
    pub const fn is_schema(&self) -> bool {
        matches!(self, Self::MissingColumns { .. })
    }
}
