//! CSV loading
//!
//! Files are read one at a time; [`read_csv_files`] concatenates them into a
//! single table. Every loaded table has the legacy answer column renamed to
//! the current one.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::Table;
use crate::config::DEFAULT_ANSWER_COLUMN;

/// Answer column name used by the first labeling batches
pub const LEGACY_ANSWER_COLUMN: &str = "Answer.vague-words.label";

/// Read a single delimited file.
///
/// Short rows are padded with empty cells. A row with more fields than the
/// header is an error.
pub fn read_csv_file(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Failed to read row {} of {}", idx + 1, path.display()))?;
        if record.len() > columns.len() {
            anyhow::bail!(
                "Row {} of {} has {} fields, expected {} (unquoted delimiter in a field?)",
                idx + 1,
                path.display(),
                record.len(),
                columns.len()
            );
        }
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    let table = Table::new(columns, rows);
    debug!("Read file=\"{}\" with {} rows.", path.display(), table.len());

    Ok(table.rename_column(LEGACY_ANSWER_COLUMN, DEFAULT_ANSWER_COLUMN))
}

/// Lazily read files, one table per file
pub fn read_csv_files_iter<I, P>(paths: I, delimiter: u8) -> impl Iterator<Item = Result<Table>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .map(move |p| read_csv_file(p.as_ref(), delimiter))
}

/// Read files into one concatenated table
pub fn read_csv_files<I, P>(paths: I, delimiter: u8) -> Result<Table>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let tables = read_csv_files_iter(paths, delimiter).collect::<Result<Vec<_>>>()?;
    Ok(Table::concat(tables))
}

/// Expand a glob pattern into matching file paths, sorted
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = glob::glob(pattern)
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read paths matching {pattern}"))?;
    paths.sort();
    Ok(paths)
}
