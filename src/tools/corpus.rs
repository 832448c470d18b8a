//! Corpus preparation: slicing a raw corpus into labeling batches and
//! rewriting files with another delimiter

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::StatsResult;
use crate::models::CM_REQUIREMENT_COLUMN;
use crate::table::{read_csv_file, write_csv_file, Table};

/// Category column of a raw corpus
pub const CORPUS_LABEL_COLUMN: &str = "label";
/// Text column of a raw corpus
pub const CORPUS_SENTENCE_COLUMN: &str = "sentence";
/// Category value of rows kept when slicing
pub const REQUIREMENT_CATEGORY: &str = "requirement";

/// Requirement rows of a raw corpus, deduplicated, split into batches that
/// hold only the `requirement` column
pub fn slice_corpus(corpus: &Table, batch_size: usize) -> StatsResult<Vec<Table>> {
    let label_idx = corpus.require_column(CORPUS_LABEL_COLUMN)?;
    let requirements = corpus
        .filter_rows(|row| row[label_idx] == REQUIREMENT_CATEGORY)
        .dedup_rows()
        .rename_column(CORPUS_SENTENCE_COLUMN, CM_REQUIREMENT_COLUMN);

    requirements
        .chunks(batch_size)
        .iter()
        .map(|batch| batch.select(&[CM_REQUIREMENT_COLUMN]))
        .collect()
}

/// File name of the k-th batch
pub fn batch_file_name(k: usize) -> String {
    format!("corpus-batch-{k}.csv")
}

/// Write batches to `dir` as `corpus-batch-{k}.csv`
pub fn write_batches(batches: &[Table], dir: &Path, delimiter: u8) -> Result<Vec<PathBuf>> {
    batches
        .iter()
        .enumerate()
        .map(|(k, batch)| {
            let path = dir.join(batch_file_name(k));
            write_csv_file(batch, &path, delimiter)?;
            Ok(path)
        })
        .collect()
}

/// Rewrite each file in place with the target delimiter
pub fn reformat_files(paths: &[PathBuf], source: u8, target: u8) -> Result<usize> {
    for path in paths {
        let table = read_csv_file(path, source)?;
        write_csv_file(&table, path, target)?;
        info!("Reformatted {}", path.display());
    }
    Ok(paths.len())
}
