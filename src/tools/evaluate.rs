//! Evaluate assigned labels against a ground-truth table

use std::collections::HashMap;

use crate::error::{StatsError, StatsResult};
use crate::models::{parse_integral, ClassificationCounts, Label, CM_REQUIREMENT_COLUMN, MAJORITY_LABEL_COLUMN};
use crate::table::Table;

/// Truth column of a ground-truth table
pub const TRUTH_COLUMN: &str = "vague";

/// Column names used by [`evaluate_labels`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationColumns {
    /// Item column, shared by both tables
    pub item: String,
    /// Assigned label column of the labeled table
    pub label: String,
    /// Label column of the truth table
    pub truth: String,
}

impl Default for EvaluationColumns {
    fn default() -> Self {
        Self {
            item: CM_REQUIREMENT_COLUMN.to_string(),
            label: MAJORITY_LABEL_COLUMN.to_string(),
            truth: TRUTH_COLUMN.to_string(),
        }
    }
}

/// Parse an assigned label; `-1` ("cannot decide") counts as vague
pub fn parse_assigned_label(raw: &str) -> StatsResult<Label> {
    match parse_integral(raw) {
        Some(1) | Some(-1) => Ok(Label::Vague),
        Some(0) => Ok(Label::NotVague),
        _ => Err(StatsError::UnsupportedLabel(raw.to_string())),
    }
}

/// Count TP/TN/FP/FN of every labeled row against its truth label
pub fn evaluate_labels(
    labeled: &Table,
    truth: &Table,
    columns: &EvaluationColumns,
) -> StatsResult<ClassificationCounts> {
    let truth_item_idx = truth.require_column(&columns.item)?;
    let truth_idx = truth.require_column(&columns.truth)?;
    let item_idx = labeled.require_column(&columns.item)?;
    let label_idx = labeled.require_column(&columns.label)?;

    // First occurrence wins
    let mut truths: HashMap<&str, &str> = HashMap::new();
    for row in truth.rows() {
        truths
            .entry(row[truth_item_idx].as_str())
            .or_insert(row[truth_idx].as_str());
    }

    let pairs = labeled
        .rows()
        .iter()
        .map(|row| {
            let item = row[item_idx].as_str();
            let raw_truth = truths
                .get(item)
                .ok_or_else(|| StatsError::MissingTruth(item.to_string()))?;
            Ok((parse_assigned_label(&row[label_idx])?, Label::parse(raw_truth)?))
        })
        .collect::<StatsResult<Vec<_>>>()?;

    Ok(ClassificationCounts::from_pairs(pairs))
}
