//! WOI CLI binary.
//!
//! Runs the weeks-of-inventory pipeline over directories of weekly extracts.

mod integration;

use clap::{ArgAction, Parser, Subcommand};
use integration::logging::init_logging;
use integration::runner::{RunOptions, load_config, run_batch};
use std::path::PathBuf;
use std::process;
use woi::data::{ColumnMapping, DuplicatePolicy};
use woi::metrics::{Brand, UNKNOWN_BRAND, brand_name_for_code, derive_brand_code};
use woi::Pipeline;
use woi::output::ExportFormat;

#[derive(Parser)]
#[command(name = "woi")]
#[command(about = "Weeks-of-inventory calculator for weekly sales/stock extracts", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every CSV extract in a directory
    Run {
        /// Directory containing the input extracts
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the output artifacts
        #[arg(short, long)]
        output: PathBuf,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read warehouse column names (prdt_cd, yearweek, tag_sale_amt, ...)
        #[arg(long)]
        legacy_columns: bool,

        /// Output format (csv, json or pretty_json)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Keep the last row of a repeated product and period instead of skipping the file
        #[arg(long)]
        keep_last: bool,

        /// Do not write a byte-order mark on CSV artifacts
        #[arg(long)]
        no_bom: bool,

        /// Leave brand_code and brand_name out of the augmented table
        #[arg(long)]
        without_brand_columns: bool,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print brand summaries as Markdown tables
        #[arg(long)]
        markdown: bool,

        /// Only print status lines
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the brand catalogue
    Brands,

    /// Describe the metrics computed for each dataset
    Metrics,

    /// Show which brand product codes are classified into
    Classify {
        /// Product codes
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            output,
            config,
            legacy_columns,
            format,
            keep_last,
            no_bom,
            without_brand_columns,
            report,
            markdown,
            quiet,
        } => {
            let mut config = load_config(config.as_deref())?;
            if legacy_columns {
                config.columns = ColumnMapping::legacy();
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if keep_last {
                config.duplicates = DuplicatePolicy::KeepLast;
            }
            if no_bom {
                config.output.utf8_bom = false;
            }
            if without_brand_columns {
                config.output.include_brand_columns = false;
            }

            let options = RunOptions {
                input,
                output,
                report,
                markdown,
                quiet,
            };
            run_batch(config, &options)?;
        }
        Commands::Brands => list_brands(),
        Commands::Metrics => print!("{}", describe_metrics(&Pipeline::default())),
        Commands::Classify { codes } => classify_codes(&codes),
    }

    Ok(())
}

fn list_brands() {
    println!("Brands:");
    println!("=======\n");

    for brand in Brand::all() {
        println!("{:>3} - {}", brand.code(), brand.name());
    }
    println!("{:>3} - {} (any other code)", "*", UNKNOWN_BRAND);
}

fn describe_metrics(pipeline: &Pipeline) -> String {
    let mut output = String::from("Metrics:\n\n");
    for metric in pipeline.metrics() {
        output.push_str(&format!("  {} - {}\n", metric.name(), metric.description()));
        output.push_str(&format!(
            "      requires: {}\n",
            metric.required_columns().join(", ")
        ));
    }
    output
}

fn classify_codes(codes: &[String]) {
    println!("{:<16} {:<6} Brand", "Product", "Code");
    println!("{}", "-".repeat(48));

    for product in codes {
        let code = derive_brand_code(product);
        println!(
            "{:<16} {:<6} {}",
            product,
            code,
            brand_name_for_code(Some(code))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_metrics_lists_each_metric() {
        let text = describe_metrics(&Pipeline::default());
        assert!(text.contains("woi - Stock divided by trailing 4/8/12-week average sales"));
        assert!(text.contains("brand_summary - "));
        assert!(text.contains("requires: product_code, year_week, sale_amount, stock_amount"));
    }

    #[test]
    fn test_run_accepts_markdown_flag() {
        let cli = Cli::try_parse_from(["woi", "run", "-i", "in", "-o", "out", "--markdown"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { markdown: true, .. }));
    }
}
