//! Discovery and loading of observation extracts.

use crate::error::Result;
use crate::schema::{
    self, ColumnMapping, DuplicatePolicy, clean_header_names, normalize, resolve_duplicates,
    validate_required_columns,
};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of input extracts.
pub const INPUT_EXTENSION: &str = "csv";

/// List the `*.csv` files directly inside `dir`, sorted by file name.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), count = files.len(), "discovered input files");
    Ok(files)
}

/// Read a CSV file with every column as text.
///
/// Type inference is left to [`normalize`] so that product codes keep their
/// leading zeros and bad amounts are reported by row.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read csv");
    Ok(df)
}

/// Turn a raw table into a validated observation table.
///
/// Cleans header names, applies the column mapping, checks the required
/// columns, coerces types and applies the duplicate policy.
pub fn prepare(
    mut df: DataFrame,
    mapping: &ColumnMapping,
    duplicates: DuplicatePolicy,
) -> Result<DataFrame> {
    clean_header_names(&mut df)?;
    schema::apply_mapping(&mut df, mapping)?;
    validate_required_columns(&df)?;
    normalize(&mut df)?;
    resolve_duplicates(df, duplicates)
}

/// Read and prepare a single extract.
pub fn load_observations(
    path: &Path,
    mapping: &ColumnMapping,
    duplicates: DuplicatePolicy,
) -> Result<DataFrame> {
    prepare(read_csv(path)?, mapping, duplicates)
}
