#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/woi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregator;
pub mod brand;
pub mod calculator;
pub mod error;
pub mod horizon;
pub mod traits;

pub use aggregator::{
    BRAND_NAME, BrandAggregator, BrandSummary, SKU_COUNT, TOTAL_STOCK_AMOUNT, classify_frame,
    latest_period, summaries_from_frame,
};
pub use brand::{
    BRAND_CODE_RULES, Brand, BrandCodeRule, UNKNOWN_BRAND, brand_name_for_code, derive_brand_code,
};
pub use calculator::WoiCalculator;
pub use error::{MetricsError, Result};
pub use horizon::WoiHorizon;
pub use traits::TableMetric;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
