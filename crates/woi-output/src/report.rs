//! Run report: what happened to each dataset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    /// Metrics computed and artifacts written.
    Processed,
    /// Rejected before computation because of its shape.
    Skipped,
    /// Failed while loading, computing or writing.
    Failed,
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Processed => "processed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Report entry for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    /// Input file.
    pub source: PathBuf,

    /// Outcome.
    pub status: DatasetStatus,

    /// Observation rows, when the table was loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,

    /// Latest period in the table, formatted `YYYY-Www`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_period: Option<String>,

    /// Number of brands in the summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_count: Option<usize>,

    /// Files written for this dataset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<PathBuf>,

    /// Required columns that were absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,

    /// Error message for skipped or failed datasets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetReport {
    /// A processed dataset.
    pub const fn processed(
        source: PathBuf,
        rows: usize,
        latest_period: Option<String>,
        brand_count: usize,
        artifacts: Vec<PathBuf>,
    ) -> Self {
        Self {
            source,
            status: DatasetStatus::Processed,
            rows: Some(rows),
            latest_period,
            brand_count: Some(brand_count),
            artifacts,
            missing_columns: Vec::new(),
            error: None,
        }
    }

    /// A dataset rejected before computation.
    pub fn skipped(source: PathBuf, missing_columns: Vec<String>, reason: String) -> Self {
        Self {
            status: DatasetStatus::Skipped,
            missing_columns,
            error: Some(reason),
            ..Self::empty(source)
        }
    }

    /// A dataset that failed mid-processing.
    pub fn failed(source: PathBuf, error: String) -> Self {
        Self {
            status: DatasetStatus::Failed,
            error: Some(error),
            ..Self::empty(source)
        }
    }

    const fn empty(source: PathBuf) -> Self {
        Self {
            source,
            status: DatasetStatus::Failed,
            rows: None,
            latest_period: None,
            brand_count: None,
            artifacts: Vec::new(),
            missing_columns: Vec::new(),
            error: None,
        }
    }

    /// File name of the source, for display.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map_or_else(|| self.source.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            })
    }
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.source_name(), self.status)?;
        match self.status {
            DatasetStatus::Processed => write!(
                f,
                " {} rows, {} brands",
                self.rows.unwrap_or_default(),
                self.brand_count.unwrap_or_default()
            ),
            DatasetStatus::Skipped | DatasetStatus::Failed => {
                write!(f, " {}", self.error.as_deref().unwrap_or("unknown error"))
            }
        }
    }
}

/// Report for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Input directory.
    pub input_dir: PathBuf,

    /// Output directory.
    pub output_dir: PathBuf,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,

    /// One entry per discovered dataset, in processing order.
    pub datasets: Vec<DatasetReport>,
}

impl RunReport {
    /// Start a report for a run.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            started_at: Utc::now(),
            finished_at: None,
            datasets: Vec::new(),
        }
    }

    /// Record a dataset outcome.
    pub fn push(&mut self, dataset: DatasetReport) {
        self.datasets.push(dataset);
    }

    /// Mark the run as finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of datasets with the given status.
    pub fn count(&self, status: DatasetStatus) -> usize {
        self.datasets.iter().filter(|d| d.status == status).count()
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to a file.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// One-line completion notice.
    pub fn completion_notice(&self) -> String {
        format!(
            "Completed: {} processed, {} skipped, {} failed",
            self.count(DatasetStatus::Processed),
            self.count(DatasetStatus::Skipped),
            self.count(DatasetStatus::Failed)
        )
    }

    /// Generate an ASCII table for terminal output.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nRun Report: {}\n", self.input_dir.display()));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<36} {:<10} {:>8} {:>8}  {}\n",
            "Dataset", "Status", "Rows", "Brands", "Detail"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for dataset in &self.datasets {
            let rows = dataset.rows.map(|r| r.to_string()).unwrap_or_default();
            let brands = dataset
                .brand_count
                .map(|b| b.to_string())
                .unwrap_or_default();
            let detail = dataset
                .latest_period
                .as_deref()
                .or(dataset.error.as_deref())
                .unwrap_or_default();
            output.push_str(&format!(
                "{:<36} {:<10} {:>8} {:>8}  {}\n",
                dataset.source_name(),
                dataset.status,
                rows,
                brands,
                detail
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&self.completion_notice());
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        let mut report = RunReport::new(PathBuf::from("in"), PathBuf::from("out"));
        report.push(DatasetReport::processed(
            PathBuf::from("in/a.csv"),
            120,
            Some("2024-W51".to_string()),
            4,
            vec![PathBuf::from("out/acc_woi_a.csv"), PathBuf::from("out/brand_summary_a.csv")],
        ));
        report.push(DatasetReport::skipped(
            PathBuf::from("in/b.csv"),
            vec!["stock_amount".to_string()],
            "Missing required columns: stock_amount".to_string(),
        ));
        report.push(DatasetReport::failed(
            PathBuf::from("in/c.csv"),
            "Invalid value".to_string(),
        ));
        report.finish();
        report
    }

    #[test]
    fn test_counts() {
        let r = report();
        assert_eq!(r.count(DatasetStatus::Processed), 1);
        assert_eq!(r.count(DatasetStatus::Skipped), 1);
        assert_eq!(r.count(DatasetStatus::Failed), 1);
        assert_eq!(
            r.completion_notice(),
            "Completed: 1 processed, 1 skipped, 1 failed"
        );
        assert!(r.finished_at.is_some());
    }

    #[test]
    fn test_json_shape() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let datasets = value["datasets"].as_array().unwrap();

        assert_eq!(datasets[0]["status"], "processed");
        assert_eq!(datasets[0]["artifacts"].as_array().unwrap().len(), 2);
        assert!(datasets[0].get("error").is_none());
        assert_eq!(datasets[1]["status"], "skipped");
        assert_eq!(datasets[1]["missing_columns"][0], "stock_amount");
        assert_eq!(datasets[2]["error"], "Invalid value");
    }

    #[test]
    fn test_json_roundtrip() {
        let r = report();
        let back: RunReport = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_ascii_table() {
        let ascii = report().to_ascii_table();
        assert!(ascii.contains("a.csv"));
        assert!(ascii.contains("2024-W51"));
        assert!(ascii.contains("skipped"));
        assert!(ascii.contains("Completed:"));
    }

    #[test]
    fn test_display() {
        let r = report();
        assert_eq!(r.datasets[0].to_string(), "a.csv [processed] 120 rows, 4 brands");
        assert_eq!(r.datasets[2].to_string(), "c.csv [failed] Invalid value");
    }
}
