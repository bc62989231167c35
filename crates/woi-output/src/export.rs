//! Export of run artifacts.
//!
//! Two artifacts are written per dataset: the augmented observation table and
//! the brand summary. Both go through the [`Exporter`] trait so the format
//! handling lives in one place.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use woi_metrics::{BRAND_NAME, BrandSummary, SKU_COUNT, TOTAL_STOCK_AMOUNT, WoiHorizon};

/// UTF-8 byte-order mark, expected by spreadsheet tools opening CSV files.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Prefix of the augmented table artifact.
pub const AUGMENTED_PREFIX: &str = "acc_woi";
/// Prefix of the brand summary artifact.
pub const SUMMARY_PREFIX: &str = "brand_summary";

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars writer error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Serialized output was not valid UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty_json" | "pretty-json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// How artifacts are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Prefix CSV files with a UTF-8 byte-order mark.
    pub utf8_bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            utf8_bom: true,
        }
    }
}

impl ExportOptions {
    const fn writes_bom(&self) -> bool {
        self.utf8_bom && matches!(self.format, ExportFormat::Csv)
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
        let content = self.export_to_string(options.format)?;
        let mut file = File::create(path)?;
        if options.writes_bom() {
            file.write_all(UTF8_BOM)?;
        }
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Header of the brand summary table.
pub fn summary_columns() -> Vec<&'static str> {
    std::iter::once(BRAND_NAME)
        .chain(WoiHorizon::ALL.iter().map(WoiHorizon::summary_column))
        .chain([TOTAL_STOCK_AMOUNT, SKU_COUNT])
        .collect()
}

impl Exporter for [BrandSummary] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                if self.is_empty() {
                    wtr.write_record(summary_columns())?;
                }
                for record in self {
                    wtr.serialize(record)?;
                }
                let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?;
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for DataFrame {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        let mut df = self.clone();
        let mut buf = Vec::new();
        match format {
            ExportFormat::Csv => {
                CsvWriter::new(&mut buf)
                    .include_header(true)
                    .finish(&mut df)?;
            }
            ExportFormat::Json | ExportFormat::PrettyJson => {
                JsonWriter::new(&mut buf)
                    .with_json_format(JsonFormat::Json)
                    .finish(&mut df)?;
            }
        }
        let data = String::from_utf8(buf)?;

        if format == ExportFormat::PrettyJson {
            let value: serde_json::Value = serde_json::from_str(&data)?;
            return Ok(serde_json::to_string_pretty(&value)?);
        }
        Ok(data)
    }
}

/// Paths of the two artifacts written for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Augmented observation table.
    pub augmented: PathBuf,
    /// Brand summary.
    pub summary: PathBuf,
}

impl ArtifactPaths {
    /// Artifact paths in `output_dir` for the dataset read from `source`.
    pub fn for_source(output_dir: &Path, source: &Path, format: ExportFormat) -> Self {
        let stem = dataset_stem(source);
        let ext = format.extension();
        Self {
            augmented: output_dir.join(format!("{AUGMENTED_PREFIX}_{stem}.{ext}")),
            summary: output_dir.join(format!("{SUMMARY_PREFIX}_{stem}.{ext}")),
        }
    }

    /// Both paths, augmented table first.
    pub fn to_vec(&self) -> Vec<PathBuf> {
        vec![self.augmented.clone(), self.summary.clone()]
    }
}

/// File name without its extension.
pub fn dataset_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn summaries() -> Vec<BrandSummary> {
        vec![
            BrandSummary {
                brand_name: "MLB".to_string(),
                avg_woi_4w: Some(4.0),
                avg_woi_8w: None,
                avg_woi_12w: Some(2.5),
                total_stock_amt: 1000.0,
                sku_count: 3,
            },
            BrandSummary {
                brand_name: "UNKNOWN".to_string(),
                avg_woi_4w: None,
                avg_woi_8w: None,
                avg_woi_12w: None,
                total_stock_amt: 0.0,
                sku_count: 1,
            },
        ]
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty_json", ExportFormat::PrettyJson)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_parse_format(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_format() {
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_summary_csv_nulls_are_empty() {
        let csv = summaries().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("brand_name,avg_woi_4w,avg_woi_8w,avg_woi_12w,total_stock_amt,sku_count")
        );
        assert_eq!(lines.next(), Some("MLB,4.0,,2.5,1000.0,3"));
        assert_eq!(lines.next(), Some("UNKNOWN,,,,0.0,1"));
    }

    #[test]
    fn test_empty_summary_keeps_header() {
        let empty: Vec<BrandSummary> = Vec::new();
        let csv = empty.export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(csv.trim_end(), summary_columns().join(","));
    }

    #[test]
    fn test_summary_json_nulls() {
        let json = summaries().export_to_string(ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["brand_name"], "MLB");
        assert!(value[0]["avg_woi_8w"].is_null());
        assert_eq!(value[1]["sku_count"], 1);
    }

    #[test]
    fn test_frame_csv_and_json() {
        let df = df![
            "product_code" => ["M001", "M002"],
            "woi_4w" => [Some(2.5), None],
        ]
        .unwrap();

        let csv = df.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("product_code,woi_4w"));
        assert!(csv.contains("M002,\n") || csv.ends_with("M002,"));

        let json = df.export_to_string(ExportFormat::PrettyJson).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert!(value[1]["woi_4w"].is_null());
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_export_to_file_bom_only_for_csv() {
        let dir = std::env::temp_dir();
        let csv_path = dir.join(format!("woi_export_bom_{}.csv", std::process::id()));
        let json_path = dir.join(format!("woi_export_bom_{}.json", std::process::id()));

        let rows = summaries();
        rows.export_to_file(&csv_path, &ExportOptions::default())
            .unwrap();
        let bytes = std::fs::read(&csv_path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let options = ExportOptions {
            format: ExportFormat::Json,
            utf8_bom: true,
        };
        rows.export_to_file(&json_path, &options).unwrap();
        let bytes = std::fs::read(&json_path).unwrap();
        assert_eq!(bytes.first(), Some(&b'['));

        std::fs::remove_file(csv_path).ok();
        std::fs::remove_file(json_path).ok();
    }

    #[test]
    fn test_artifact_names() {
        let paths = ArtifactPaths::for_source(
            Path::new("/out"),
            Path::new("/in/acc_2024w51.csv"),
            ExportFormat::Csv,
        );
        assert_eq!(paths.augmented, Path::new("/out/acc_woi_acc_2024w51.csv"));
        assert_eq!(paths.summary, Path::new("/out/brand_summary_acc_2024w51.csv"));

        let json = ArtifactPaths::for_source(
            Path::new("/out"),
            Path::new("weekly.csv"),
            ExportFormat::PrettyJson,
        );
        assert_eq!(json.summary, Path::new("/out/brand_summary_weekly.json"));
    }
}
