//! Aggregate grid-search evaluation files
//!
//! Each evaluation file is a JSON document of the shape
//!
//! ```json
//! {
//!   "hyperparameter": { "C": 1.0, "ngram_range": [1, 2] },
//!   "data_set": { "resampling_strategy": "smote" },
//!   "fold_results": [ { "metrics": { "test": { "vague": { "recall": 0.8 } } } } ]
//! }
//! ```
//!
//! The vague-class test metrics of the last fold are merged with the
//! hyperparameters into one flat row per file.

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::table::Table;

/// Hyperparameters left out of the aggregated rows
pub const DROPPED_HYPERPARAMETERS: &[&str] = &["ngram_range", "max_features"];

/// One evaluation file, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchEntry {
    pub source: PathBuf,
    pub metric_value: f64,
    pub fields: Map<String, Value>,
}

/// Flatten one parsed evaluation document
pub fn parse_evaluation(source: &Path, document: &Value, metric: &str) -> Result<GridSearchEntry> {
    let folds = document
        .get("fold_results")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("missing \"fold_results\" array"))?;
    let metrics = folds
        .last()
        .and_then(|fold| fold.pointer("/metrics/test/vague"))
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow!("last fold has no \"metrics.test.vague\" object"))?;
    let metric_value = metrics
        .get(metric)
        .and_then(Value::as_f64)
        .ok_or_else(|| anyhow!("metric \"{metric}\" is missing or not a number"))?;

    let mut fields = metrics.clone();
    if let Some(hyperparameters) = document.get("hyperparameter").and_then(Value::as_object) {
        for (key, value) in hyperparameters {
            if !DROPPED_HYPERPARAMETERS.contains(&key.as_str()) {
                fields.insert(key.clone(), value.clone());
            }
        }
    }
    let strategy = document
        .pointer("/data_set/resampling_strategy")
        .cloned()
        .unwrap_or(Value::Null);
    fields.insert("resampling_strategy".to_string(), strategy);
    if !fields.contains_key("kfold_splits") {
        fields.insert("kfold_splits".to_string(), Value::from(folds.len()));
    }

    Ok(GridSearchEntry {
        source: source.to_path_buf(),
        metric_value,
        fields,
    })
}

/// Read and flatten evaluation files in the given order
pub fn load_evaluations(paths: &[PathBuf], metric: &str) -> Result<Vec<GridSearchEntry>> {
    paths
        .iter()
        .map(|path| {
            debug!("Reading evaluation {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let document: Value = serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            parse_evaluation(path, &document, metric)
                .with_context(|| format!("Unexpected evaluation layout in {}", path.display()))
        })
        .collect()
}

/// Sort ascending by metric and keep the best `best_n` entries.
///
/// Entries with equal values keep their input order.
pub fn rank_entries(mut entries: Vec<GridSearchEntry>, best_n: Option<usize>) -> Vec<GridSearchEntry> {
    entries.sort_by(|a, b| a.metric_value.total_cmp(&b.metric_value));
    if let Some(n) = best_n {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Export entries as a table, columns in first-seen order
pub fn grid_search_table(entries: &[GridSearchEntry]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for entry in entries {
        for key in entry.fields.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    let rows = entries
        .iter()
        .map(|entry| {
            columns
                .iter()
                .map(|c| entry.fields.get(c).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();
    Table::new(columns, rows)
}
