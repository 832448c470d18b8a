//! Compare command - agreement between two batch groups

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use vaguereq::config::ProjectConfig;
use vaguereq::reporters::{self, MetricReport};
use vaguereq::table::read_csv_files;
use vaguereq::tools::compare_groups;
use vaguereq::TracingSink;

use super::{emit, resolve_inputs};

pub fn run(
    config: &ProjectConfig,
    groups: &[Vec<String>],
    drop_ties: bool,
    prefer_not_vague: bool,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let delimiter = config.input_delimiter()?;
    let tables = groups
        .iter()
        .enumerate()
        .map(|(i, inputs)| {
            info!("Preprocess group {}.", i + 1);
            read_csv_files(resolve_inputs(inputs)?, delimiter)
        })
        .collect::<Result<Vec<_>>>()?;

    let report = compare_groups(
        &tables,
        &config.matrix_config(drop_ties),
        config.majority.prefer_vague && !prefer_not_vague,
        &mut TracingSink,
    )
    .context("Cannot compare batch groups")?;
    info!(
        "Overall requirements=\"{}\". Equal label=\"{}\". Unequal label=\"{}\".",
        report.items, report.unanimous, report.disagreeing
    );

    let rendered = reporters::report(
        &MetricReport::from(&report),
        format,
        config.output_delimiter()?,
    )?;
    emit(&rendered, output)
}
