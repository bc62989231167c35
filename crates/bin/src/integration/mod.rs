//! Glue between the command line and the pipeline crates.

pub(crate) mod logging;
pub(crate) mod runner;
