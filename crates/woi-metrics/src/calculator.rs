//! Weeks-of-inventory calculator.
//!
//! For every product the rows are put in period order, sales are averaged over
//! trailing windows of 4, 8 and 12 periods, and stock is divided by each
//! average. Windows shrink to the available history at the start of a
//! product's series, so every row gets an average.

use crate::error::Result;
use crate::horizon::WoiHorizon;
use crate::traits::{TableMetric, ensure_numeric};
use polars::prelude::*;
use tracing::debug;
use woi_data::{PRODUCT_CODE, SALE_AMOUNT, STOCK_AMOUNT, YEAR_WEEK};

const REQUIRED_COLUMNS: &[&str] = &[PRODUCT_CODE, YEAR_WEEK, SALE_AMOUNT, STOCK_AMOUNT];

/// Appends trailing average sales and WOI columns to an observation table.
///
/// Output holds every input row, sorted by `(product_code, year_week)` with
/// ties kept in input order, plus `avg_{4,8,12}w_sale` and `woi_{4,8,12}w`.
/// A WOI value is null whenever its average is not positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct WoiCalculator;

impl WoiCalculator {
    /// Create a calculator.
    pub const fn new() -> Self {
        Self
    }

    /// Names of the columns this calculator appends, averages first.
    pub fn output_columns() -> Vec<&'static str> {
        WoiHorizon::ALL
            .iter()
            .map(WoiHorizon::avg_sale_column)
            .chain(WoiHorizon::ALL.iter().map(WoiHorizon::woi_column))
            .collect()
    }

    /// Sale amount `lag` periods back within the same product, null before
    /// the product's first period.
    fn lagged_sale(lag: usize) -> Expr {
        col(SALE_AMOUNT)
            .cast(DataType::Float64)
            .shift(lit(lag as i64))
            .over([col(PRODUCT_CODE)])
    }

    // Each window is summed from its own members so a window of zeros is
    // exactly zero, whatever came before it.
    fn average_expr(horizon: WoiHorizon) -> Expr {
        let (sum, count) = (1..horizon.weeks()).fold(
            (
                Self::lagged_sale(0).fill_null(lit(0.0)),
                Self::lagged_sale(0).is_not_null().cast(DataType::Float64),
            ),
            |(sum, count), lag| {
                (
                    sum + Self::lagged_sale(lag).fill_null(lit(0.0)),
                    count + Self::lagged_sale(lag).is_not_null().cast(DataType::Float64),
                )
            },
        );
        when(count.clone().gt(lit(0.0)))
            .then(sum / count)
            .otherwise(lit(NULL).cast(DataType::Float64))
            .alias(horizon.avg_sale_column())
    }

    fn ratio_expr(horizon: WoiHorizon) -> Expr {
        let average = col(horizon.avg_sale_column());
        let ratio = col(STOCK_AMOUNT).cast(DataType::Float64) / average.clone();
        when(average.gt(lit(0.0)).and(ratio.clone().is_finite()))
            .then(ratio)
            .otherwise(lit(NULL).cast(DataType::Float64))
            .alias(horizon.woi_column())
    }
}

impl TableMetric for WoiCalculator {
    fn name(&self) -> &str {
        "woi"
    }

    fn description(&self) -> &str {
        "Stock divided by trailing 4/8/12-week average sales, per product"
    }

    fn required_columns(&self) -> &[&str] {
        REQUIRED_COLUMNS
    }

    fn compute_unchecked(&self, data: &DataFrame) -> Result<DataFrame> {
        ensure_numeric(data, SALE_AMOUNT)?;
        ensure_numeric(data, STOCK_AMOUNT)?;

        let averages: Vec<Expr> = WoiHorizon::ALL.into_iter().map(Self::average_expr).collect();
        let ratios: Vec<Expr> = WoiHorizon::ALL.into_iter().map(Self::ratio_expr).collect();

        let result = data
            .clone()
            .lazy()
            .sort(
                [PRODUCT_CODE, YEAR_WEEK],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .with_columns(averages)
            .with_columns(ratios)
            .collect()?;

        debug!(rows = result.height(), "computed weeks of inventory");
        Ok(result)
    }
}
