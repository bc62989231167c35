//! Observation schema: canonical column names, aliasing and normalization.

use crate::error::{DataError, Result};
use crate::year_week::YearWeek;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Product code column (grouping key).
pub const PRODUCT_CODE: &str = "product_code";
/// Period column, normalized to an integer `YYYYWW` key.
pub const YEAR_WEEK: &str = "year_week";
/// Sales at tag price.
pub const SALE_AMOUNT: &str = "sale_amount";
/// On-hand stock at tag price.
pub const STOCK_AMOUNT: &str = "stock_amount";
/// Optional pre-assigned brand code.
pub const BRAND_CODE: &str = "brand_code";

/// Columns every observation table must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [PRODUCT_CODE, YEAR_WEEK, SALE_AMOUNT, STOCK_AMOUNT];

/// Byte-order mark some spreadsheet exports prepend to the first header.
const UTF8_BOM: char = '\u{feff}';

/// Source column names for each canonical observation column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Source name of `product_code`.
    pub product_code: String,
    /// Source name of `year_week`.
    pub year_week: String,
    /// Source name of `sale_amount`.
    pub sale_amount: String,
    /// Source name of `stock_amount`.
    pub stock_amount: String,
    /// Source name of the optional `brand_code`.
    pub brand_code: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            product_code: PRODUCT_CODE.to_string(),
            year_week: YEAR_WEEK.to_string(),
            sale_amount: SALE_AMOUNT.to_string(),
            stock_amount: STOCK_AMOUNT.to_string(),
            brand_code: BRAND_CODE.to_string(),
        }
    }
}

impl ColumnMapping {
    /// Column names used by the warehouse accessory extract.
    pub fn legacy() -> Self {
        Self {
            product_code: "prdt_cd".to_string(),
            year_week: "yearweek".to_string(),
            sale_amount: "tag_sale_amt".to_string(),
            stock_amount: "tag_stock_amt".to_string(),
            brand_code: "brand_cd".to_string(),
        }
    }

    /// (source, canonical) pairs, required columns first.
    fn pairs(&self) -> [(&str, &'static str); 5] {
        [
            (self.product_code.as_str(), PRODUCT_CODE),
            (self.year_week.as_str(), YEAR_WEEK),
            (self.sale_amount.as_str(), SALE_AMOUNT),
            (self.stock_amount.as_str(), STOCK_AMOUNT),
            (self.brand_code.as_str(), BRAND_CODE),
        ]
    }
}

/// What to do when a product code appears more than once in a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Treat the table as malformed.
    #[default]
    Reject,
    /// Keep the row that appears last in file order.
    KeepLast,
}

/// Strip a leading byte-order mark and surrounding whitespace from header names.
pub fn clean_header_names(df: &mut DataFrame) -> Result<()> {
    let renames: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .filter_map(|name| {
            let cleaned = name.trim_start_matches(UTF8_BOM).trim();
            (cleaned != name.as_str()).then(|| (name.to_string(), cleaned.to_string()))
        })
        .collect();

    for (old, new) in renames {
        debug!(from = %old, to = %new, "cleaning header name");
        df.rename(&old, new.into())?;
    }
    Ok(())
}

/// Rename source columns to canonical names.
///
/// A canonical column that already exists is left alone, so tables written
/// with canonical headers pass through unchanged under any mapping.
pub fn apply_mapping(df: &mut DataFrame, mapping: &ColumnMapping) -> Result<()> {
    for (source, canonical) in mapping.pairs() {
        if source == canonical || has_column(df, canonical) || !has_column(df, source) {
            continue;
        }
        debug!(from = source, to = canonical, "renaming column");
        df.rename(source, canonical.into())?;
    }
    Ok(())
}

/// Check that every required column is present.
///
/// Reports all missing columns at once, in schema order.
pub fn validate_required_columns(df: &DataFrame) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::MissingColumns(missing))
    }
}

/// Coerce the required columns to their canonical types.
///
/// - `product_code` → string, no nulls
/// - `year_week` → `i64` `YYYYWW` key, every value a valid period
/// - `sale_amount`, `stock_amount` → `f64`, strictly, no nulls
/// - `brand_code` (when present) → string
pub fn normalize(df: &mut DataFrame) -> Result<()> {
    let product = df
        .column(PRODUCT_CODE)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    ensure_no_nulls(&product, PRODUCT_CODE)?;
    df.with_column(product)?;

    let year_week = normalize_year_week(df.column(YEAR_WEEK)?.as_materialized_series())?;
    df.with_column(year_week)?;

    for name in [SALE_AMOUNT, STOCK_AMOUNT] {
        let amounts = normalize_amount(df.column(name)?.as_materialized_series(), name)?;
        df.with_column(amounts)?;
    }

    if has_column(df, BRAND_CODE) {
        let brand = df
            .column(BRAND_CODE)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        df.with_column(brand)?;
    }

    Ok(())
}

/// Apply the duplicate policy to a normalized table.
pub fn resolve_duplicates(df: DataFrame, policy: DuplicatePolicy) -> Result<DataFrame> {
    let duplicated = df.select([PRODUCT_CODE, YEAR_WEEK])?.is_duplicated()?;
    let Some(row) = duplicated.into_iter().position(|flag| flag == Some(true)) else {
        return Ok(df);
    };

    if policy == DuplicatePolicy::Reject {
        let product_code = df.column(PRODUCT_CODE)?.str()?.get(row).unwrap_or_default();
        let year_week = df.column(YEAR_WEEK)?.i64()?.get(row).unwrap_or_default();
        return Err(DataError::DuplicateObservation {
            product_code: product_code.to_string(),
            year_week,
        });
    }

    let before = df.height();
    let deduped = df
        .lazy()
        .unique_stable(
            Some(vec![PRODUCT_CODE.into(), YEAR_WEEK.into()]),
            UniqueKeepStrategy::Last,
        )
        .collect()?;
    debug!(
        dropped = before - deduped.height(),
        "keeping last observation per product and period"
    );
    Ok(deduped)
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn ensure_no_nulls(series: &Series, name: &str) -> Result<()> {
    match series.null_count() {
        0 => Ok(()),
        count => Err(DataError::NullValues {
            column: name.to_string(),
            count,
        }),
    }
}

fn normalize_year_week(series: &Series) -> Result<Series> {
    ensure_no_nulls(series, YEAR_WEEK)?;

    let keys: Vec<i64> = match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.unwrap_or_default();
                value
                    .parse::<YearWeek>()
                    .map(|yw| yw.key())
                    .map_err(|_| invalid_period(row, value))
            })
            .collect::<Result<_>>()?,
        dtype if dtype.is_integer() => series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.unwrap_or_default();
                YearWeek::from_key(value)
                    .map(|yw| yw.key())
                    .map_err(|_| invalid_period(row, &value.to_string()))
            })
            .collect::<Result<_>>()?,
        dtype => {
            return Err(DataError::UnsupportedType {
                column: YEAR_WEEK.to_string(),
                dtype: dtype.to_string(),
            });
        }
    };

    Ok(Series::new(YEAR_WEEK.into(), keys))
}

fn invalid_period(row: usize, value: &str) -> DataError {
    DataError::InvalidValue {
        column: YEAR_WEEK.to_string(),
        row,
        reason: format!("{value:?} is not a year-week"),
    }
}

fn normalize_amount(series: &Series, name: &str) -> Result<Series> {
    ensure_no_nulls(series, name)?;

    if series.dtype().is_integer() || series.dtype().is_float() {
        return Ok(series.cast(&DataType::Float64)?);
    }

    if series.dtype() != &DataType::String {
        return Err(DataError::UnsupportedType {
            column: name.to_string(),
            dtype: series.dtype().to_string(),
        });
    }

    // Strings that polars could not infer as numbers: parse row by row so the
    // error can point at the offending value.
    let values: Vec<f64> = series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let raw = value.unwrap_or_default();
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidValue {
                    column: name.to_string(),
                    row,
                    reason: format!("{raw:?} is not a number"),
                })
        })
        .collect::<Result<_>>()?;

    Ok(Series::new(name.into(), values))
}
