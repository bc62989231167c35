#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/woi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{
    ArtifactPaths, ExportError, ExportFormat, ExportOptions, Exporter, UTF8_BOM, dataset_stem,
    summary_columns,
};
pub use report::{DatasetReport, DatasetStatus, ReportError, RunReport};
pub use summary::BrandSummaryTable;
