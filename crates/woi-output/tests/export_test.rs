//! Integration tests for exporting computed metrics.

use polars::prelude::*;
use std::fs;
use woi_data::YearWeek;
use woi_metrics::{BrandAggregator, TableMetric, WoiCalculator, classify_frame, latest_period};
use woi_output::{ArtifactPaths, BrandSummaryTable, ExportFormat, ExportOptions, Exporter, UTF8_BOM};

fn observations() -> DataFrame {
    df![
        "product_code" => ["M001", "M001", "ST5", "ST5", "S123"],
        "year_week" => [202450i64, 202451, 202450, 202451, 202451],
        "sale_amount" => [100.0, 300.0, 0.0, 0.0, 40.0],
        "stock_amount" => [800.0, 800.0, 60.0, 60.0, 200.0],
    ]
    .unwrap()
}

#[test]
fn test_full_export_workflow() {
    let augmented = WoiCalculator::new().compute(&observations()).unwrap();
    let classified = classify_frame(&augmented).unwrap();
    let rows = BrandAggregator::new().summarize(&classified).unwrap();

    let dir = std::env::temp_dir().join(format!("woi-output-it-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let paths = ArtifactPaths::for_source(&dir, "weekly.csv".as_ref(), ExportFormat::Csv);
    let options = ExportOptions::default();

    classified.export_to_file(&paths.augmented, &options).unwrap();
    rows.export_to_file(&paths.summary, &options).unwrap();

    let augmented_bytes = fs::read(&paths.augmented).unwrap();
    assert!(augmented_bytes.starts_with(UTF8_BOM));
    let augmented_text = String::from_utf8(augmented_bytes[UTF8_BOM.len()..].to_vec()).unwrap();
    let header = augmented_text.lines().next().unwrap();
    assert!(header.starts_with("product_code,year_week,sale_amount,stock_amount,avg_4w_sale"));
    assert!(header.ends_with("brand_code,brand_name"));
    assert_eq!(augmented_text.lines().count(), 6);

    let summary_text = fs::read_to_string(&paths.summary).unwrap();
    let summary_text = summary_text.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = summary_text.lines().collect();
    assert_eq!(lines.len(), 4);
    // M001 latest: avg4 = 200 -> woi 4
    assert_eq!(lines[1], "MLB,4.0,4.0,4.0,800.0,1");
    // ST5 has no sales, so no WOI
    assert_eq!(lines[2], "SERGIO TACCHINI,,,,60.0,1");
    assert_eq!(lines[3], "UNKNOWN,5.0,5.0,5.0,200.0,1");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_summary_table_rendering() {
    let augmented = WoiCalculator::new().compute(&observations()).unwrap();
    let rows = BrandAggregator::new().summarize(&augmented).unwrap();
    let period = latest_period(&augmented)
        .unwrap()
        .map(|key| YearWeek::from_key(key).unwrap());

    let table = BrandSummaryTable::new("weekly".to_string(), period, rows);
    assert_eq!(table.total_skus(), 3);

    let ascii = table.to_ascii_table();
    assert!(ascii.contains("Period: 2024-W51"));
    assert!(ascii.contains("UNKNOWN"));

    let markdown = table.to_markdown();
    assert!(markdown.contains("| Brand |"));
}
