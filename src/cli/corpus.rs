//! words, grid-search, slice and reformat commands

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use vaguereq::config::{delimiter_byte, ProjectConfig};
use vaguereq::table::{expand_glob, read_csv_file, read_csv_files_iter, write_csv_file, write_csv_string};
use vaguereq::tools::{
    count_words, grid_search_table, load_evaluations, rank_entries, reformat_files, slice_corpus,
    word_count_table, write_batches,
};

use super::{emit, emit_table, resolve_inputs};

pub fn words(config: &ProjectConfig, inputs: &[String], output: Option<&Path>) -> Result<()> {
    let paths = resolve_inputs(inputs)?;
    info!("Count all words of {} file(s).", paths.len());

    let tables = read_csv_files_iter(&paths, config.input_delimiter()?).collect::<Result<Vec<_>>>()?;
    let counts = count_words(&tables).context("Cannot count words")?;
    info!("Found {} distinct tokens", counts.len());

    emit_table(&word_count_table(&counts), config, output)
}

pub fn grid_search(
    pattern: &str,
    metric: &str,
    best: Option<usize>,
    delimiter: char,
    output: Option<&Path>,
) -> Result<()> {
    let paths = expand_glob(pattern)?;
    info!(
        "Search all evaluation results matching the glob pattern=\"{}\" ({} files).",
        pattern,
        paths.len()
    );

    let entries = rank_entries(load_evaluations(&paths, metric)?, best);
    let table = grid_search_table(&entries);
    let delimiter = delimiter_byte(delimiter)?;
    match output {
        Some(path) => {
            write_csv_file(&table, path, delimiter)?;
            eprintln!("Wrote {} entries to: {}", table.len(), path.display());
            Ok(())
        }
        None => emit(&write_csv_string(&table, delimiter)?, None),
    }
}

pub fn slice(corpus: &Path, batch_size: usize, out_dir: &Path, delimiter: char) -> Result<()> {
    info!("Slice corpus in batches of size=\"{}\".", batch_size);
    let delimiter = delimiter_byte(delimiter)?;
    let table = read_csv_file(corpus, delimiter)?;

    let batches = slice_corpus(&table, batch_size)
        .with_context(|| format!("Cannot slice {}", corpus.display()))?;
    let written = write_batches(&batches, out_dir, delimiter)?;
    eprintln!("Wrote {} batch file(s) to: {}", written.len(), out_dir.display());
    Ok(())
}

pub fn reformat(pattern: &str, from: char, to: char) -> Result<()> {
    let paths = expand_glob(pattern)?;
    let count = reformat_files(&paths, delimiter_byte(from)?, delimiter_byte(to)?)?;
    eprintln!("Reformatted {count} file(s)");
    Ok(())
}
