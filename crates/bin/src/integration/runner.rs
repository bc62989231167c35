//! Batch run with progress reporting.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use woi::data::discover_csv_files;
use woi::output::{BrandSummaryTable, DatasetStatus};
use woi::{Pipeline, PipelineConfig};

/// Settings for one `woi run` invocation.
#[derive(Debug)]
pub(crate) struct RunOptions {
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) report: Option<PathBuf>,
    pub(crate) markdown: bool,
    pub(crate) quiet: bool,
}

pub(crate) fn run_batch(
    config: PipelineConfig,
    options: &RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("WOI batch run");
    println!("  Input:  {}", options.input.display());
    println!("  Output: {}", options.output.display());
    println!("  Format: {:?}", config.output.format);
    println!();

    let files = discover_csv_files(&options.input)?;
    if files.is_empty() {
        println!("No CSV files found in {}", options.input.display());
    }
    info!(count = files.len(), "starting run");

    let pb = progress_bar(files.len() as u64, options.quiet)?;
    let mut tables: Vec<BrandSummaryTable> = Vec::new();

    let pipeline = Pipeline::new(config);
    let report = pipeline.run_files(&files, &options.input, &options.output, |result| {
        let marker = match result.report.status {
            DatasetStatus::Processed => "✓",
            DatasetStatus::Skipped => "-",
            DatasetStatus::Failed => "✗",
        };
        pb.println(format!("  {marker} {}", result.report));
        pb.inc(1);
        if let Some(table) = &result.table {
            tables.push(table.clone());
        }
    })?;
    pb.finish_and_clear();

    if !options.quiet {
        for table in &tables {
            print!("{}", render_table(table, options.markdown));
        }
        print!("{}", report.to_ascii_table());
    }

    if let Some(path) = &options.report {
        report.write_json(path)?;
        println!("Report written to {}", path.display());
    }

    println!("{}", report.completion_notice());
    Ok(())
}

fn render_table(table: &BrandSummaryTable, markdown: bool) -> String {
    if markdown {
        table.to_markdown()
    } else {
        table.to_ascii_table()
    }
}

fn progress_bar(len: u64, quiet: bool) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    if quiet || len == 0 {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Processing extracts...");
    Ok(pb)
}

/// Load the configuration file, if one was given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Ok(PipelineConfig::from_file(path)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}
