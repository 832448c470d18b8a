//! Compare the majority labels of two or more batch groups
//!
//! Each group is reduced to one majority label per item. The groups then act
//! as raters: items rated by every group are tallied again and the agreement
//! between groups is measured.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::MatrixConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::StatsResult;
use crate::models::{ConfusionRow, CM_REQUIREMENT_COLUMN, MAJORITY_LABEL_COLUMN};
use crate::stats::{
    build_confusion_matrix, fleiss_kappa, free_marginal_kappa, majority_table,
    resolve_majority_labels,
};
use crate::table::Table;

/// Agreement between batch groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub items: usize,
    pub unanimous: usize,
    pub disagreeing: usize,
    pub disagreement_percentage: f64,
    pub fleiss_kappa: f64,
    pub free_marginal_kappa: f64,
}

/// Majority-labeled table for one group of raw batches
pub fn majority_frame(
    group: &Table,
    config: &MatrixConfig,
    prefer_vague: bool,
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<Table> {
    let matrix = build_confusion_matrix(group, config, sink)?;
    let labeled = resolve_majority_labels(&matrix, prefer_vague, sink);
    Ok(majority_table(&labeled))
}

/// Confusion matrix with one vote per group, restricted to items every
/// group labeled
pub fn group_confusion_matrix(
    frames: &[Table],
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<Vec<ConfusionRow>> {
    let combined = Table::concat(frames.iter().cloned());
    let item_idx = combined.require_column(CM_REQUIREMENT_COLUMN)?;

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for row in combined.rows() {
        *occurrences.entry(row[item_idx].as_str()).or_default() += 1;
    }
    let complete: HashSet<String> = occurrences
        .into_iter()
        .filter(|(_, n)| *n == frames.len())
        .map(|(item, _)| item.to_string())
        .collect();
    let shared = combined.filter_rows(|row| complete.contains(&row[item_idx]));

    let label_config = MatrixConfig::for_labels(CM_REQUIREMENT_COLUMN, MAJORITY_LABEL_COLUMN, false);
    build_confusion_matrix(&shared, &label_config, sink)
}

/// Full comparison of raw batch groups
pub fn compare_groups(
    groups: &[Table],
    config: &MatrixConfig,
    prefer_vague: bool,
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<ComparisonReport> {
    let frames = groups
        .iter()
        .map(|g| majority_frame(g, config, prefer_vague, sink))
        .collect::<StatsResult<Vec<_>>>()?;
    let matrix = group_confusion_matrix(&frames, sink)?;

    let items = matrix.len();
    let unanimous = matrix.iter().filter(|r| r.is_unanimous()).count();
    let disagreeing = items - unanimous;
    let disagreement_percentage = if items == 0 {
        sink.record(Diagnostic::ZeroDenominator {
            metric: "disagreement_percentage",
        });
        0.0
    } else {
        disagreeing as f64 / items as f64 * 100.0
    };

    Ok(ComparisonReport {
        items,
        unanimous,
        disagreeing,
        disagreement_percentage,
        fleiss_kappa: fleiss_kappa(&matrix, sink)?,
        free_marginal_kappa: free_marginal_kappa(&matrix, sink)?,
    })
}
