//! Run configuration.
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "columns": { "product_code": "prdt_cd", "year_week": "yearweek" },
//!   "duplicates": "keep_last",
//!   "output": { "format": "pretty_json", "include_brand_columns": false }
//! }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use woi_data::{ColumnMapping, DuplicatePolicy};
use woi_output::{ExportFormat, ExportOptions};

/// Output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Artifact format.
    pub format: ExportFormat,
    /// Prefix CSV artifacts with a UTF-8 byte-order mark.
    pub utf8_bom: bool,
    /// Keep `brand_code` and `brand_name` in the augmented table.
    pub include_brand_columns: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            utf8_bom: true,
            include_brand_columns: true,
        }
    }
}

impl OutputConfig {
    /// Writer options for artifacts.
    pub const fn export_options(&self) -> ExportOptions {
        ExportOptions {
            format: self.format,
            utf8_bom: self.utf8_bom,
        }
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input column names.
    pub columns: ColumnMapping,
    /// Handling of repeated (product, period) pairs.
    pub duplicates: DuplicatePolicy,
    /// Output settings.
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Configuration preset for the warehouse extract column names.
    pub fn legacy() -> Self {
        Self {
            columns: ColumnMapping::legacy(),
            ..Self::default()
        }
    }
}
