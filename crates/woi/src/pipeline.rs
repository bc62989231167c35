//! Per-dataset pipeline and the run loop.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use woi_data::{YearWeek, discover_csv_files, load_observations, prepare};
use woi_metrics::{
    BrandAggregator, BrandSummary, TableMetric, WoiCalculator, classify_frame, latest_period,
    summaries_from_frame,
};
use woi_output::{ArtifactPaths, BrandSummaryTable, DatasetReport, Exporter, RunReport, dataset_stem};

/// Metrics computed for one observation table.
#[derive(Debug, Clone)]
pub struct ComputedDataset {
    /// Augmented table as it will be written.
    pub augmented: DataFrame,
    /// One row per brand in the latest period.
    pub summary: Vec<BrandSummary>,
    /// Latest period in the table.
    pub latest_period: Option<YearWeek>,
}

/// Outcome of one dataset in a run.
#[derive(Debug, Clone)]
pub struct DatasetResult {
    /// Report entry.
    pub report: DatasetReport,
    /// Brand summary, present when the dataset was processed.
    pub table: Option<BrandSummaryTable>,
}

/// Runs the WOI calculator and brand aggregator over extracts.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    calculator: WoiCalculator,
    aggregator: BrandAggregator,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Metrics applied to each dataset, in order.
    pub fn metrics(&self) -> [&dyn TableMetric; 2] {
        [&self.calculator, &self.aggregator]
    }

    /// Compute metrics for a raw table.
    ///
    /// The table goes through the same column mapping, validation and
    /// duplicate handling as a file would.
    pub fn compute_frame(&self, raw: DataFrame) -> Result<ComputedDataset> {
        let observations = prepare(raw, &self.config.columns, self.config.duplicates)?;
        self.compute(&observations)
    }

    /// Compute metrics for a validated observation table.
    pub fn compute(&self, observations: &DataFrame) -> Result<ComputedDataset> {
        let augmented = self.calculator.compute(observations)?;
        let classified = classify_frame(&augmented)?;
        let summary = summaries_from_frame(&self.aggregator.compute(&classified)?)?;

        let period = latest_period(&augmented)?
            .map(YearWeek::from_key)
            .transpose()?;

        let augmented = if self.config.output.include_brand_columns {
            classified
        } else {
            augmented
        };

        Ok(ComputedDataset {
            augmented,
            summary,
            latest_period: period,
        })
    }

    /// Load, compute and write the artifacts for one extract.
    ///
    /// Nothing is written unless both artifacts can be produced.
    pub fn process_dataset(&self, source: &Path, output_dir: &Path) -> Result<DatasetResult> {
        info!(source = %source.display(), "processing dataset");
        let observations =
            load_observations(source, &self.config.columns, self.config.duplicates)?;
        let rows = observations.height();
        let computed = self.compute(&observations)?;

        let options = self.config.output.export_options();
        let paths = ArtifactPaths::for_source(output_dir, source, options.format);
        let written = computed
            .augmented
            .export_to_file(&paths.augmented, &options)
            .and_then(|()| computed.summary.export_to_file(&paths.summary, &options));
        if let Err(e) = written {
            // Leave no half-written dataset behind
            for path in paths.to_vec() {
                let _ = fs::remove_file(path);
            }
            return Err(e.into());
        }
        debug!(
            augmented = %paths.augmented.display(),
            summary = %paths.summary.display(),
            "wrote artifacts"
        );

        let brands = computed.summary.len();
        let table = BrandSummaryTable::new(
            dataset_stem(source),
            computed.latest_period,
            computed.summary,
        );
        let report = DatasetReport::processed(
            source.to_path_buf(),
            rows,
            computed.latest_period.map(|p| p.to_string()),
            brands,
            paths.to_vec(),
        );
        info!(source = %source.display(), rows, brands, "dataset processed");

        Ok(DatasetResult {
            report,
            table: Some(table),
        })
    }

    /// Process one extract, turning any error into a skipped or failed entry.
    pub fn process_isolated(&self, source: &Path, output_dir: &Path) -> DatasetResult {
        match self.process_dataset(source, output_dir) {
            Ok(result) => result,
            Err(e) => {
                let report = classify_failure(source, &e);
                DatasetResult {
                    report,
                    table: None,
                }
            }
        }
    }

    /// Process the given extracts in order.
    ///
    /// `on_dataset` is called after each one. Only failure to create the
    /// output directory aborts the run.
    pub fn run_files<F>(
        &self,
        files: &[PathBuf],
        input_dir: &Path,
        output_dir: &Path,
        mut on_dataset: F,
    ) -> Result<RunReport>
    where
        F: FnMut(&DatasetResult),
    {
        fs::create_dir_all(output_dir)?;
        let mut report = RunReport::new(input_dir.to_path_buf(), output_dir.to_path_buf());

        for source in files {
            let result = self.process_isolated(source, output_dir);
            on_dataset(&result);
            report.push(result.report);
        }

        report.finish();
        info!("{}", report.completion_notice());
        Ok(report)
    }

    /// Discover every extract in `input_dir` and process them in file-name order.
    pub fn run<F>(&self, input_dir: &Path, output_dir: &Path, on_dataset: F) -> Result<RunReport>
    where
        F: FnMut(&DatasetResult),
    {
        let files = discover_csv_files(input_dir)?;
        if files.is_empty() {
            warn!(dir = %input_dir.display(), "no input files found");
        }
        self.run_files(&files, input_dir, output_dir, on_dataset)
    }
}

fn classify_failure(source: &Path, err: &PipelineError) -> DatasetReport {
    if err.is_schema() {
        warn!(source = %source.display(), error = %err, "dataset skipped");
        DatasetReport::skipped(source.to_path_buf(), err.missing_columns(), err.to_string())
    } else {
        error!(source = %source.display(), error = %err, "dataset failed");
        DatasetReport::failed(source.to_path_buf(), err.to_string())
    }
}
