#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/woi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;
pub mod year_week;

pub use error::{DataError, Result};
pub use loader::{discover_csv_files, load_observations, prepare, read_csv};
pub use schema::{
    BRAND_CODE, ColumnMapping, DuplicatePolicy, PRODUCT_CODE, REQUIRED_COLUMNS, SALE_AMOUNT,
    STOCK_AMOUNT, YEAR_WEEK,
};
pub use year_week::YearWeek;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
