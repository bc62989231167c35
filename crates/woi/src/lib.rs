#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/woi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use woi_data as data;
pub use woi_metrics as metrics;
pub use woi_output as output;

pub use config::{OutputConfig, PipelineConfig};
pub use error::{PipelineError, Result};
pub use pipeline::{ComputedDataset, DatasetResult, Pipeline};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
