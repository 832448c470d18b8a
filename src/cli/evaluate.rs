//! evaluate, rank and predict commands

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use vaguereq::config::ProjectConfig;
use vaguereq::models::Label;
use vaguereq::reporters::{self, MetricReport};
use vaguereq::stats::{
    average_precision_at_k, mean_average_precision, predict_with_threshold,
    probability_pairs_from_table, scored_records_from_table, ClassificationMetrics, ScoreColumns,
};
use vaguereq::table::read_csv_file;
use vaguereq::tools::{evaluate_labels, EvaluationColumns};
use vaguereq::TracingSink;

use super::{emit, emit_table};

pub fn evaluate(
    config: &ProjectConfig,
    labeled_path: &Path,
    truth_path: &Path,
    columns: EvaluationColumns,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let delimiter = config.input_delimiter()?;
    let labeled = read_csv_file(labeled_path, delimiter)?;
    let truth = read_csv_file(truth_path, delimiter)?;

    let counts = evaluate_labels(&labeled, &truth, &columns)
        .with_context(|| format!("Cannot evaluate {}", labeled_path.display()))?;
    info!(
        "TP={} TN={} FP={} FN={}",
        counts.true_positive, counts.true_negative, counts.false_positive, counts.false_negative
    );

    let metrics = ClassificationMetrics::compute(counts, &mut TracingSink);
    let rendered = reporters::report(
        &MetricReport::from(&metrics),
        format,
        config.output_delimiter()?,
    )?;
    emit(&rendered, output)
}

pub fn rank(
    config: &ProjectConfig,
    input: &Path,
    query: Option<&str>,
    k: Option<usize>,
    columns: ScoreColumns,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let table = read_csv_file(input, config.input_delimiter()?)?;
    let records = scored_records_from_table(&table, &columns)
        .with_context(|| format!("Cannot read scores from {}", input.display()))?;
    let mut sink = TracingSink;

    let report = match query {
        Some(query) => {
            let label = if query == "vague" {
                Label::Vague
            } else {
                Label::NotVague
            };
            info!(
                "Calculate average precision @ k for query=\"{}\" and k=\"{}\"",
                label,
                k.map_or_else(|| "all".to_string(), |k| k.to_string())
            );
            let ap = average_precision_at_k(&records, label, k, &mut sink)?;
            MetricReport::new("Ranking").score("average_precision", "Average precision", ap)
        }
        None => MetricReport::from(&mean_average_precision(&records, &mut sink)?),
    };

    let rendered = reporters::report(&report, format, config.output_delimiter()?)?;
    emit(&rendered, output)
}

pub fn predict(
    config: &ProjectConfig,
    input: &Path,
    threshold: f64,
    (vague_column, not_vague_column): (&str, &str),
    column: &str,
    output: Option<&Path>,
) -> Result<()> {
    let table = read_csv_file(input, config.input_delimiter()?)?;
    let pairs = probability_pairs_from_table(&table, vague_column, not_vague_column)
        .with_context(|| format!("Cannot read probabilities from {}", input.display()))?;

    let labels = predict_with_threshold(&pairs, threshold);
    let vague = labels.iter().filter(|l| **l == Label::Vague).count();
    info!(
        "Predicted {} of {} rows as vague with threshold {}",
        vague,
        labels.len(),
        threshold
    );

    let predicted = table.with_column(
        column,
        labels.iter().map(|l| l.value().to_string()).collect(),
    );
    emit_table(&predicted, config, output)
}
