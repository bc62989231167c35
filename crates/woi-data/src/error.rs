//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading and validating an extract.
#[derive(Debug, Error)]
pub enum DataError {
    /// One or more required columns are absent
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The same product code appears twice in one period
    #[error("Duplicate observation for product {product_code} in period {year_week}")]
    DuplicateObservation {
        /// Product code of the duplicated pair
        product_code: String,
        /// Period key of the duplicated pair
        year_week: i64,
    },

    /// A value could not be interpreted as the expected type
    #[error("Invalid value in column {column} at row {row}: {reason}")]
    InvalidValue {
        /// Column holding the value
        column: String,
        /// Zero-based row index
        row: usize,
        /// What was wrong with the value
        reason: String,
    },

    /// Missing value in a required column
    #[error("Column {column} has {count} missing value(s)")]
    NullValues {
        /// Column with nulls
        column: String,
        /// Number of nulls found
        count: usize,
    },

    /// Unsupported column data type
    #[error("Column {column} has unsupported type {dtype}")]
    UnsupportedType {
        /// Column name
        column: String,
        /// Observed polars data type
        dtype: String,
    },

    /// Year-week parsing error
    #[error("Invalid year-week {0:?}")]
    InvalidYearWeek(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether the error describes the table's shape rather than its values.
    ///
    /// Schema errors mean the dataset is skipped; every other error means it
    /// failed mid-processing.
    pub const fn is_schema(&self) -> bool {
        matches!(
            self,
            Self::MissingColumns(_) | Self::DuplicateObservation { .. }
        )
    }
}
