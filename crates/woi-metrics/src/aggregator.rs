//! Brand-level summary of the latest period.

use crate::brand::{brand_name_for_code, derive_brand_code};
use crate::error::Result;
use crate::horizon::WoiHorizon;
use crate::traits::TableMetric;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use woi_data::{BRAND_CODE, PRODUCT_CODE, STOCK_AMOUNT, YEAR_WEEK};

/// Brand reporting name column.
pub const BRAND_NAME: &str = "brand_name";
/// Summed stock column.
pub const TOTAL_STOCK_AMOUNT: &str = "total_stock_amt";
/// Row count column.
pub const SKU_COUNT: &str = "sku_count";

const REQUIRED_COLUMNS: &[&str] = &[
    PRODUCT_CODE,
    YEAR_WEEK,
    STOCK_AMOUNT,
    "woi_4w",
    "woi_8w",
    "woi_12w",
];

/// One row of the brand summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSummary {
    /// Brand reporting name
    pub brand_name: String,
    /// Mean 4-week WOI, null when no product had one
    pub avg_woi_4w: Option<f64>,
    /// Mean 8-week WOI
    pub avg_woi_8w: Option<f64>,
    /// Mean 12-week WOI
    pub avg_woi_12w: Option<f64>,
    /// Summed stock amount
    pub total_stock_amt: f64,
    /// Number of rows for the brand in the latest period
    pub sku_count: u64,
}

impl BrandSummary {
    /// Mean WOI for a horizon.
    pub const fn avg_woi(&self, horizon: WoiHorizon) -> Option<f64> {
        match horizon {
            WoiHorizon::FourWeeks => self.avg_woi_4w,
            WoiHorizon::EightWeeks => self.avg_woi_8w,
            WoiHorizon::TwelveWeeks => self.avg_woi_12w,
        }
    }
}

/// Attach `brand_code` and `brand_name` to every row.
///
/// An existing `brand_code` column is used as-is; otherwise the code is
/// inferred from `product_code`. Codes outside the catalogue, and missing
/// codes, are named [`UNKNOWN_BRAND`](crate::brand::UNKNOWN_BRAND).
pub fn classify_frame(data: &DataFrame) -> Result<DataFrame> {
    let codes: StringChunked = match data.column(BRAND_CODE) {
        Ok(existing) => {
            let existing = existing.cast(&DataType::String)?;
            existing.str()?.clone()
        }
        Err(_) => {
            let products = data.column(PRODUCT_CODE)?.cast(&DataType::String)?;
            products
                .str()?
                .into_iter()
                .map(|code| code.map(derive_brand_code))
                .collect()
        }
    };

    let names: StringChunked = codes
        .into_iter()
        .map(|code| Some(brand_name_for_code(code)))
        .collect();

    let mut out = data.clone();
    out.with_column(codes.with_name(BRAND_CODE.into()).into_series())?;
    out.with_column(names.with_name(BRAND_NAME.into()).into_series())?;
    Ok(out)
}

/// Most recent period key in the table, `None` when it is empty.
pub fn latest_period(data: &DataFrame) -> Result<Option<i64>> {
    let periods = data.column(YEAR_WEEK)?.cast(&DataType::Int64)?;
    Ok(periods.i64()?.max())
}

/// Summarizes WOI, stock and SKU count per brand for the latest period.
///
/// Output columns: `brand_name`, `avg_woi_4w`, `avg_woi_8w`, `avg_woi_12w`,
/// `total_stock_amt`, `sku_count`, one row per brand present, sorted by
/// brand name.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandAggregator;

impl BrandAggregator {
    /// Create an aggregator.
    pub const fn new() -> Self {
        Self
    }

    /// Aggregate and convert to typed rows.
    pub fn summarize(&self, data: &DataFrame) -> Result<Vec<BrandSummary>> {
        summaries_from_frame(&self.compute(data)?)
    }
}

impl TableMetric for BrandAggregator {
    fn name(&self) -> &str {
        "brand_summary"
    }

    fn description(&self) -> &str {
        "Mean WOI, total stock and SKU count per brand in the latest period"
    }

    fn required_columns(&self) -> &[&str] {
        REQUIRED_COLUMNS
    }

    fn compute_unchecked(&self, data: &DataFrame) -> Result<DataFrame> {
        let classified = classify_frame(data)?;

        let mut aggregations: Vec<Expr> = WoiHorizon::ALL
            .iter()
            .map(|h| {
                col(h.woi_column())
                    .cast(DataType::Float64)
                    .mean()
                    .alias(h.summary_column())
            })
            .collect();
        aggregations.push(
            col(STOCK_AMOUNT)
                .cast(DataType::Float64)
                .sum()
                .alias(TOTAL_STOCK_AMOUNT),
        );
        aggregations.push(len().cast(DataType::Int64).alias(SKU_COUNT));

        let summary = classified
            .lazy()
            .filter(col(YEAR_WEEK).eq(col(YEAR_WEEK).max()))
            .group_by([col(BRAND_NAME)])
            .agg(aggregations)
            .sort([BRAND_NAME], SortMultipleOptions::default())
            .collect()?;

        debug!(brands = summary.height(), "aggregated brand summary");
        Ok(summary)
    }
}

/// Read brand summary rows out of an aggregated table.
pub fn summaries_from_frame(summary: &DataFrame) -> Result<Vec<BrandSummary>> {
    let names = summary.column(BRAND_NAME)?.str()?;
    let woi: Vec<&Float64Chunked> = WoiHorizon::ALL
        .iter()
        .map(|h| summary.column(h.summary_column())?.f64())
        .collect::<PolarsResult<_>>()?;
    let stock = summary.column(TOTAL_STOCK_AMOUNT)?.f64()?;
    let counts = summary.column(SKU_COUNT)?.i64()?;

    let rows = (0..summary.height())
        .map(|i| BrandSummary {
            brand_name: names.get(i).unwrap_or(crate::brand::UNKNOWN_BRAND).to_string(),
            avg_woi_4w: woi[0].get(i),
            avg_woi_8w: woi[1].get(i),
            avg_woi_12w: woi[2].get(i),
            total_stock_amt: stock.get(i).unwrap_or_default(),
            sku_count: counts.get(i).unwrap_or_default().unsigned_abs(),
        })
        .collect();
    Ok(rows)
}
