//! End-to-end runs over extracts written to a scratch directory.

use std::fs;
use std::path::{Path, PathBuf};
use woi::data::DuplicatePolicy;
use woi::output::{DatasetStatus, ExportFormat, RunReport};
use woi::{Pipeline, PipelineConfig};

struct Scratch {
    root: PathBuf,
}

impl Scratch {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("woi-it-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("in")).unwrap();
        Self { root }
    }

    fn input(&self) -> PathBuf {
        self.root.join("in")
    }

    fn output(&self) -> PathBuf {
        self.root.join("out")
    }

    fn write(&self, name: &str, contents: &str) {
        fs::write(self.input().join(name), contents).unwrap();
    }

    fn outputs(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.output())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

const GOOD: &str = "product_code,year_week,sale_amount,stock_amount\n\
M001,202401,100,1000\n\
M001,202402,200,1000\n\
M001,202403,300,1000\n\
M001,202404,400,1000\n\
ST5,202404,10,50\n\
S123,202404,0,70\n";

fn run(scratch: &Scratch, config: PipelineConfig) -> RunReport {
    Pipeline::new(config)
        .run(&scratch.input(), &scratch.output(), |_| {})
        .unwrap()
}

fn read_text(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap()
        .trim_start_matches('\u{feff}')
        .to_string()
}

#[test]
fn test_missing_column_skips_dataset_and_run_continues() {
    let scratch = Scratch::new("skip");
    scratch.write(
        "a_week.csv",
        "product_code,year_week,sale_amount\nM001,202401,100\n",
    );
    scratch.write("b_week.csv", GOOD);

    let report = run(&scratch, PipelineConfig::default());

    assert_eq!(report.datasets.len(), 2);
    let skipped = &report.datasets[0];
    assert_eq!(skipped.status, DatasetStatus::Skipped);
    assert_eq!(skipped.missing_columns, vec!["stock_amount".to_string()]);
    assert!(skipped.artifacts.is_empty());

    assert_eq!(report.datasets[1].status, DatasetStatus::Processed);
    assert_eq!(
        scratch.outputs(),
        vec!["acc_woi_b_week.csv", "brand_summary_b_week.csv"]
    );
}

#[test]
fn test_processed_dataset_artifacts() {
    let scratch = Scratch::new("processed");
    scratch.write("week.csv", GOOD);

    let report = run(&scratch, PipelineConfig::default());
    let dataset = &report.datasets[0];
    assert_eq!(dataset.rows, Some(6));
    assert_eq!(dataset.brand_count, Some(3));
    assert_eq!(dataset.latest_period.as_deref(), Some("2024-W04"));

    let summary = read_text(&scratch.output().join("brand_summary_week.csv"));
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(
        lines,
        vec![
            "brand_name,avg_woi_4w,avg_woi_8w,avg_woi_12w,total_stock_amt,sku_count",
            "MLB,4.0,4.0,4.0,1000.0,1",
            "SERGIO TACCHINI,5.0,5.0,5.0,50.0,1",
            "UNKNOWN,,,,70.0,1",
        ]
    );

    let augmented = read_text(&scratch.output().join("acc_woi_week.csv"));
    assert_eq!(augmented.lines().count(), 7);
    assert!(augmented.lines().next().unwrap().contains("woi_12w"));
}

#[test]
fn test_malformed_dataset_fails_without_stopping_run() {
    let scratch = Scratch::new("failed");
    scratch.write(
        "a.csv",
        "product_code,year_week,sale_amount,stock_amount\nM001,202401,lots,10\n",
    );
    scratch.write(
        "b.csv",
        "product_code,year_week,sale_amount,stock_amount\nM001,2024-99,1,10\n",
    );
    scratch.write("c.csv", GOOD);

    let mut seen = Vec::new();
    let report = Pipeline::default()
        .run(&scratch.input(), &scratch.output(), |result| {
            seen.push(result.report.status);
        })
        .unwrap();

    assert_eq!(
        seen,
        vec![
            DatasetStatus::Failed,
            DatasetStatus::Failed,
            DatasetStatus::Processed
        ]
    );
    assert!(report.datasets[0].error.as_deref().unwrap().contains("sale_amount"));
    assert_eq!(report.count(DatasetStatus::Failed), 2);
    assert_eq!(scratch.outputs().len(), 2);
}

#[test]
fn test_failed_write_removes_partial_artifacts() {
    let scratch = Scratch::new("partial");
    scratch.write("week.csv", GOOD);
    scratch.write("z_week.csv", GOOD);
    // A directory where the summary file should go makes the second write fail
    fs::create_dir_all(scratch.output().join("brand_summary_week.csv")).unwrap();

    let report = run(&scratch, PipelineConfig::default());

    let failed = &report.datasets[0];
    assert_eq!(failed.status, DatasetStatus::Failed);
    assert!(failed.error.is_some());
    assert!(failed.artifacts.is_empty());
    assert_eq!(report.datasets[1].status, DatasetStatus::Processed);
    assert!(!scratch.output().join("acc_woi_week.csv").exists());
    assert_eq!(
        scratch.outputs(),
        vec![
            "acc_woi_z_week.csv",
            "brand_summary_week.csv",
            "brand_summary_z_week.csv"
        ]
    );
}

#[test]
fn test_empty_input_directory() {
    let scratch = Scratch::new("empty");
    let report = run(&scratch, PipelineConfig::default());
    assert!(report.datasets.is_empty());
    assert!(scratch.output().is_dir());
    assert_eq!(
        report.completion_notice(),
        "Completed: 0 processed, 0 skipped, 0 failed"
    );
}

#[test]
fn test_missing_input_directory_is_fatal() {
    let scratch = Scratch::new("nodir");
    let missing = scratch.root.join("nope");
    assert!(
        Pipeline::default()
            .run(&missing, &scratch.output(), |_| {})
            .is_err()
    );
}

#[test]
fn test_legacy_extract_to_json() {
    let scratch = Scratch::new("legacy");
    scratch.write(
        "acc.csv",
        "\u{feff}prdt_cd,yearweek,tag_sale_amt,tag_stock_amt,brand_cd\n\
         Q1,202450,10,100,V\n\
         Q1,202451,30,100,V\n",
    );

    let mut config = PipelineConfig::legacy();
    config.output.format = ExportFormat::PrettyJson;
    let report = run(&scratch, config);
    assert_eq!(report.datasets[0].status, DatasetStatus::Processed);

    let summary: serde_json::Value =
        serde_json::from_str(&read_text(&scratch.output().join("brand_summary_acc.json")))
            .unwrap();
    assert_eq!(summary[0]["brand_name"], "DUVETICA");
    assert_eq!(summary[0]["avg_woi_4w"], 5.0);

    let augmented: serde_json::Value =
        serde_json::from_str(&read_text(&scratch.output().join("acc_woi_acc.json"))).unwrap();
    assert_eq!(augmented.as_array().unwrap().len(), 2);
    assert_eq!(augmented[1]["brand_name"], "DUVETICA");
}

#[test]
fn test_duplicate_policy() {
    let scratch = Scratch::new("dupes");
    scratch.write(
        "dup.csv",
        "product_code,year_week,sale_amount,stock_amount\n\
         M001,202401,100,1000\n\
         M001,202401,250,1000\n",
    );

    let report = run(&scratch, PipelineConfig::default());
    assert_eq!(report.datasets[0].status, DatasetStatus::Skipped);
    assert!(scratch.outputs().is_empty());

    let config = PipelineConfig {
        duplicates: DuplicatePolicy::KeepLast,
        ..PipelineConfig::default()
    };
    let report = run(&scratch, config);
    assert_eq!(report.datasets[0].status, DatasetStatus::Processed);
    assert_eq!(report.datasets[0].rows, Some(1));

    let summary = read_text(&scratch.output().join("brand_summary_dup.csv"));
    assert!(summary.contains("MLB,4.0,4.0,4.0,1000.0,1"));
}

#[test]
fn test_report_json_written() {
    let scratch = Scratch::new("report");
    scratch.write("week.csv", GOOD);

    let report = run(&scratch, PipelineConfig::default());
    let path = scratch.root.join("report.json");
    report.write_json(&path).unwrap();

    let back: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back.datasets.len(), 1);
    assert_eq!(back.datasets[0].artifacts.len(), 2);
}
