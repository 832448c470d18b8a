//! Majority label resolution

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::models::{
    ConfusionRow, Label, MajorityLabeledRow, CM_NOT_VAGUE_COUNT_COLUMN, CM_REQUIREMENT_COLUMN,
    CM_VAGUE_COUNT_COLUMN, MAJORITY_LABEL_COLUMN,
};
use crate::table::Table;

/// Label for one tally. Ties go to `Vague` when `prefer_vague` is set.
pub fn majority_label(row: &ConfusionRow, prefer_vague: bool) -> Label {
    use std::cmp::Ordering;
    match row.vague_count.cmp(&row.not_vague_count) {
        Ordering::Greater => Label::Vague,
        Ordering::Less => Label::NotVague,
        Ordering::Equal if prefer_vague => Label::Vague,
        Ordering::Equal => Label::NotVague,
    }
}

/// Annotate every row of a confusion matrix with its majority label
pub fn resolve_majority_labels(
    matrix: &[ConfusionRow],
    prefer_vague: bool,
    sink: &mut dyn DiagnosticSink,
) -> Vec<MajorityLabeledRow> {
    let labeled: Vec<MajorityLabeledRow> = matrix
        .iter()
        .map(|row| MajorityLabeledRow {
            row: row.clone(),
            majority_label: majority_label(row, prefer_vague),
        })
        .collect();

    let vague = labeled
        .iter()
        .filter(|r| r.majority_label == Label::Vague)
        .count();
    sink.record(Diagnostic::MajoritySummary {
        vague,
        not_vague: labeled.len() - vague,
    });

    labeled
}

/// Export majority-labeled rows as a table
pub fn majority_table(rows: &[MajorityLabeledRow]) -> Table {
    Table::new(
        vec![
            CM_REQUIREMENT_COLUMN.to_string(),
            CM_VAGUE_COUNT_COLUMN.to_string(),
            CM_NOT_VAGUE_COUNT_COLUMN.to_string(),
            MAJORITY_LABEL_COLUMN.to_string(),
        ],
        rows.iter()
            .map(|r| {
                vec![
                    r.row.item.clone(),
                    r.row.vague_count.to_string(),
                    r.row.not_vague_count.to_string(),
                    r.majority_label.value().to_string(),
                ]
            })
            .collect(),
    )
}
