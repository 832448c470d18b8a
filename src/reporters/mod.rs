//! Output reporters for metric reports
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `csv` - Two-column `metric,value` table
//! - `markdown` - GitHub-flavored Markdown table

mod csv;
mod json;
mod markdown;
mod text;

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

use crate::stats::{AgreementReport, ClassificationMetrics, MeanAveragePrecision};
use crate::tools::ComparisonReport;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// A single reported value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Score(f64),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Score(v) => write!(f, "{v}"),
        }
    }
}

/// One row of a metric report
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    /// Machine name (JSON key)
    pub key: &'static str,
    /// Human-readable name
    pub label: &'static str,
    pub value: MetricValue,
}

/// Named list of metrics, the common shape of every printed result
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReport {
    pub title: String,
    pub rows: Vec<MetricRow>,
}

impl MetricReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn count(mut self, key: &'static str, label: &'static str, value: u64) -> Self {
        self.rows.push(MetricRow {
            key,
            label,
            value: MetricValue::Count(value),
        });
        self
    }

    pub fn score(mut self, key: &'static str, label: &'static str, value: f64) -> Self {
        self.rows.push(MetricRow {
            key,
            label,
            value: MetricValue::Score(value),
        });
        self
    }
}

impl From<&ClassificationMetrics> for MetricReport {
    fn from(m: &ClassificationMetrics) -> Self {
        MetricReport::new("Classification metrics")
            .count("true_positive", "True positives", m.counts.true_positive)
            .count("true_negative", "True negatives", m.counts.true_negative)
            .count("false_positive", "False positives", m.counts.false_positive)
            .count("false_negative", "False negatives", m.counts.false_negative)
            .score("accuracy", "Accuracy", m.accuracy)
            .score("precision", "Precision", m.precision)
            .score("recall", "Recall", m.recall)
            .score("specificity", "Specificity", m.specificity)
            .score("false_negative_rate", "False negative rate", m.false_negative_rate)
            .score("false_positive_rate", "False positive rate", m.false_positive_rate)
            .score("f1_score", "F1 score", m.f1_score)
    }
}

impl From<&AgreementReport> for MetricReport {
    fn from(r: &AgreementReport) -> Self {
        MetricReport::new("Inter-rater agreement")
            .count("items", "Requirements", r.items as u64)
            .count("raters", "Raters per requirement", r.raters)
            .score("observed_agreement", "Observed agreement", r.observed_agreement)
            .score("fleiss_kappa", "Fleiss' kappa", r.fleiss_kappa)
            .score("free_marginal_kappa", "Free-marginal kappa", r.free_marginal_kappa)
    }
}

impl From<&ComparisonReport> for MetricReport {
    fn from(r: &ComparisonReport) -> Self {
        MetricReport::new("Batch comparison")
            .count("items", "Requirements", r.items as u64)
            .count("unanimous", "Equal label", r.unanimous as u64)
            .count("disagreeing", "Unequal label", r.disagreeing as u64)
            .score(
                "disagreement_percentage",
                "Unequally labeled (%)",
                r.disagreement_percentage,
            )
            .score("fleiss_kappa", "Fleiss' kappa", r.fleiss_kappa)
            .score("free_marginal_kappa", "Free-marginal kappa", r.free_marginal_kappa)
    }
}

impl From<&MeanAveragePrecision> for MetricReport {
    fn from(r: &MeanAveragePrecision) -> Self {
        MetricReport::new("Ranking")
            .score("mean_average_precision", "Mean average precision", r.mean)
            .score("average_precision_vague", "Average precision (vague)", r.vague)
            .score(
                "average_precision_not_vague",
                "Average precision (not vague)",
                r.not_vague,
            )
    }
}

/// Render a report in the specified format
pub fn report(report: &MetricReport, format: &str, delimiter: u8) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt, delimiter)
}

/// Render a report using an OutputFormat enum.
///
/// `delimiter` only affects the CSV format.
pub fn report_with_format(report: &MetricReport, format: OutputFormat, delimiter: u8) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Csv => csv::render(report, delimiter),
        OutputFormat::Markdown => markdown::render(report),
    }
}
