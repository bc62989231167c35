//! Common interface for table-in, table-out metrics.

use crate::error::{MetricsError, Result};
use polars::prelude::*;

/// A metric computed from one table into another.
pub trait TableMetric: Send + Sync + std::fmt::Debug {
    /// Unique snake_case identifier.
    fn name(&self) -> &str;

    /// Human-readable description of what the metric produces.
    fn description(&self) -> &str;

    /// Columns required in the input table.
    fn required_columns(&self) -> &[&str];

    /// Compute the metric, assuming the required columns exist.
    fn compute_unchecked(&self, data: &DataFrame) -> Result<DataFrame>;

    /// Check the input columns, then compute.
    fn compute(&self, data: &DataFrame) -> Result<DataFrame> {
        self.check_columns(data)?;
        self.compute_unchecked(data)
    }

    /// Fail with every missing required column.
    fn check_columns(&self, data: &DataFrame) -> Result<()> {
        let missing: Vec<String> = self
            .required_columns()
            .iter()
            .filter(|name| data.column(name).is_err())
            .map(|name| (*name).to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MetricsError::MissingColumns {
                metric: self.name().to_string(),
                columns: missing,
            })
        }
    }
}

/// Fail unless `column` holds integers or floats.
pub(crate) fn ensure_numeric(data: &DataFrame, column: &str) -> Result<()> {
    let dtype = data.column(column)?.dtype();
    if dtype.is_integer() || dtype.is_float() {
        Ok(())
    } else {
        Err(MetricsError::NonNumeric {
            column: column.to_string(),
            dtype: dtype.to_string(),
        })
    }
}
