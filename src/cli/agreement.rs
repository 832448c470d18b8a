//! kappa, majority and ties commands

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use vaguereq::config::ProjectConfig;
use vaguereq::reporters::{self, MetricReport};
use vaguereq::stats::{
    agreement_report, build_confusion_matrix, confusion_table, find_ties, majority_table,
    resolve_majority_labels, ties_table,
};
use vaguereq::table::{read_csv_files, write_csv_file, Table};
use vaguereq::TracingSink;

use super::{emit, emit_table, resolve_inputs};

fn load_batches(config: &ProjectConfig, inputs: &[String]) -> Result<Table> {
    let paths = resolve_inputs(inputs)?;
    info!("Reading {} batch file(s)", paths.len());
    read_csv_files(&paths, config.input_delimiter()?)
}

pub fn kappa(
    config: &ProjectConfig,
    inputs: &[String],
    drop_ties: bool,
    matrix_output: Option<&Path>,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let batches = load_batches(config, inputs)?;
    let mut sink = TracingSink;

    let matrix = build_confusion_matrix(&batches, &config.matrix_config(drop_ties), &mut sink)?;
    if let Some(path) = matrix_output {
        write_csv_file(&confusion_table(&matrix), path, config.output_delimiter()?)?;
        info!("Wrote confusion matrix to {}", path.display());
    }

    let agreement =
        agreement_report(&matrix, &mut sink).context("Cannot compute agreement statistics")?;
    info!(
        "Calculated Fleiss' kappa = {}. Free-marginal kappa = {}.",
        agreement.fleiss_kappa, agreement.free_marginal_kappa
    );

    let rendered = reporters::report(
        &MetricReport::from(&agreement),
        format,
        config.output_delimiter()?,
    )?;
    emit(&rendered, output)
}

pub fn majority(
    config: &ProjectConfig,
    inputs: &[String],
    drop_ties: bool,
    prefer_not_vague: bool,
    output: Option<&Path>,
) -> Result<()> {
    let batches = load_batches(config, inputs)?;
    let mut sink = TracingSink;

    let matrix = build_confusion_matrix(&batches, &config.matrix_config(drop_ties), &mut sink)?;
    let prefer_vague = config.majority.prefer_vague && !prefer_not_vague;
    let labeled = resolve_majority_labels(&matrix, prefer_vague, &mut sink);
    emit_table(&majority_table(&labeled), config, output)
}

pub fn ties(config: &ProjectConfig, inputs: &[String], output: Option<&Path>) -> Result<()> {
    let batches = load_batches(config, inputs)?;
    let matrix_config = config.matrix_config(false);

    let tied = find_ties(&batches, &matrix_config, &mut TracingSink)?;
    emit_table(&ties_table(&tied, &matrix_config), config, output)
}
