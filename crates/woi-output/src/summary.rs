//! Console and markdown rendering of brand summaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use woi_data::YearWeek;
use woi_metrics::BrandSummary;

/// Brand summary of one dataset, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSummaryTable {
    /// Dataset the summary was computed from.
    pub source: String,

    /// Period the summary covers.
    pub period: Option<YearWeek>,

    /// One row per brand.
    pub rows: Vec<BrandSummary>,
}

impl BrandSummaryTable {
    /// Create a summary table.
    pub const fn new(source: String, period: Option<YearWeek>, rows: Vec<BrandSummary>) -> Self {
        Self {
            source,
            period,
            rows,
        }
    }

    /// Total stock over all brands.
    pub fn total_stock(&self) -> f64 {
        self.rows.iter().map(|r| r.total_stock_amt).sum()
    }

    /// Total SKU count over all brands.
    pub fn total_skus(&self) -> u64 {
        self.rows.iter().map(|r| r.sku_count).sum()
    }

    fn period_label(&self) -> String {
        self.period
            .map_or_else(|| "-".to_string(), |p| p.to_string())
    }

    /// Generate an ASCII table for terminal output.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nBrand Summary: {}\n", self.source));
        output.push_str(&format!("Period: {}", self.period_label()));
        if let Some(start) = self.period.and_then(|p| p.start_date()) {
            output.push_str(&format!(" (week of {start})"));
        }
        output.push('\n');
        output.push_str(&"=".repeat(88));
        output.push('\n');

        output.push_str(&format!(
            "{:<24} {:>10} {:>10} {:>10} {:>18} {:>10}\n",
            "Brand", "WOI 4w", "WOI 8w", "WOI 12w", "Stock", "SKUs"
        ));
        output.push_str(&"-".repeat(88));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<24} {:>10} {:>10} {:>10} {:>18.0} {:>10}\n",
                row.brand_name,
                fmt_woi(row.avg_woi_4w),
                fmt_woi(row.avg_woi_8w),
                fmt_woi(row.avg_woi_12w),
                row.total_stock_amt,
                row.sku_count
            ));
        }

        output.push_str(&"-".repeat(88));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>10} {:>10} {:>10} {:>18.0} {:>10}\n",
            "Total",
            "",
            "",
            "",
            self.total_stock(),
            self.total_skus()
        ));

        output
    }

    /// Generate a Markdown report.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Brand Summary: {}\n\n", self.source));
        output.push_str(&format!("**Period:** {}\n\n", self.period_label()));

        output.push_str("| Brand | WOI 4w | WOI 8w | WOI 12w | Stock | SKUs |\n");
        output.push_str("|-------|-------:|-------:|--------:|------:|-----:|\n");
        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:.0} | {} |\n",
                row.brand_name,
                fmt_woi(row.avg_woi_4w),
                fmt_woi(row.avg_woi_8w),
                fmt_woi(row.avg_woi_12w),
                row.total_stock_amt,
                row.sku_count
            ));
        }

        output
    }
}

impl fmt::Display for BrandSummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} brands, {} SKUs in {}",
            self.source,
            self.rows.len(),
            self.total_skus(),
            self.period_label()
        )
    }
}

fn fmt_woi(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
