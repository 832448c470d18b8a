//! Per-item vote tallies ("confusion matrix")
//!
//! Groups raw labeled records by item and counts vague / not-vague votes.
//! Unknown answers are reported and skipped; they count toward neither total.

use std::collections::BTreeMap;

use crate::config::MatrixConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::StatsResult;
use crate::models::{ConfusionRow, LabeledRecord};
use crate::table::Table;

/// Extract labeled records using the configured column names
pub fn labeled_records(table: &Table, config: &MatrixConfig) -> StatsResult<Vec<LabeledRecord>> {
    let item_idx = table.require_column(&config.item_column)?;
    let answer_idx = table.require_column(&config.answer_column)?;
    Ok(table
        .rows()
        .iter()
        .map(|row| LabeledRecord {
            item: row[item_idx].clone(),
            answer: row[answer_idx].clone(),
        })
        .collect())
}

/// Tally votes per item, sorted by item identifier
fn tally(
    records: &[LabeledRecord],
    config: &MatrixConfig,
    sink: &mut dyn DiagnosticSink,
) -> Vec<ConfusionRow> {
    let mut groups: BTreeMap<&str, (u64, u64)> = BTreeMap::new();

    for record in records {
        let entry = groups.entry(record.item.as_str()).or_insert((0, 0));
        if config.vague_answers.contains(&record.answer) {
            entry.0 += 1;
        } else if config.not_vague_answers.contains(&record.answer) {
            entry.1 += 1;
        } else {
            sink.record(Diagnostic::UnknownAnswer {
                item: record.item.clone(),
                answer: record.answer.clone(),
            });
        }
    }

    groups
        .into_iter()
        .map(|(item, (vague, not_vague))| ConfusionRow::new(item, vague, not_vague))
        .collect()
}

/// Build the confusion matrix from labeled records
pub fn build_confusion_matrix_from_records(
    records: &[LabeledRecord],
    config: &MatrixConfig,
    sink: &mut dyn DiagnosticSink,
) -> Vec<ConfusionRow> {
    let grouped = tally(records, config, sink);
    let grouped_count = grouped.len();

    let rows: Vec<ConfusionRow> = if config.drop_ties {
        let kept: Vec<ConfusionRow> = grouped.into_iter().filter(|r| !r.is_tie()).collect();
        sink.record(Diagnostic::DroppedTies {
            count: grouped_count - kept.len(),
        });
        kept
    } else {
        grouped
    };

    sink.record(Diagnostic::MatrixSummary {
        retained: rows.len(),
        grouped: grouped_count,
        vague_votes: rows.iter().map(|r| r.vague_count).sum(),
        not_vague_votes: rows.iter().map(|r| r.not_vague_count).sum(),
    });

    rows
}

/// Build the confusion matrix from a table of raw answers
pub fn build_confusion_matrix(
    table: &Table,
    config: &MatrixConfig,
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<Vec<ConfusionRow>> {
    let records = labeled_records(table, config)?;
    Ok(build_confusion_matrix_from_records(&records, config, sink))
}

/// Identifiers of items whose votes are tied
///
/// `config.drop_ties` is ignored.
pub fn find_ties(
    table: &Table,
    config: &MatrixConfig,
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<Vec<String>> {
    let records = labeled_records(table, config)?;
    let grouped = tally(&records, config, sink);
    let ties: Vec<String> = grouped
        .iter()
        .filter(|r| r.is_tie())
        .map(|r| r.item.clone())
        .collect();
    sink.record(Diagnostic::TiesFound {
        ties: ties.len(),
        grouped: grouped.len(),
    });
    Ok(ties)
}

/// Table of tied items with an empty answer column, ready for re-labeling
pub fn ties_table(ties: &[String], config: &MatrixConfig) -> Table {
    Table::new(
        vec![config.item_column.clone(), config.answer_column.clone()],
        ties.iter().map(|t| vec![t.clone(), String::new()]).collect(),
    )
}

/// Export a confusion matrix as a table
pub fn confusion_table(rows: &[ConfusionRow]) -> Table {
    use crate::models::{CM_NOT_VAGUE_COUNT_COLUMN, CM_REQUIREMENT_COLUMN, CM_VAGUE_COUNT_COLUMN};
    Table::new(
        vec![
            CM_REQUIREMENT_COLUMN.to_string(),
            CM_VAGUE_COUNT_COLUMN.to_string(),
            CM_NOT_VAGUE_COUNT_COLUMN.to_string(),
        ],
        rows.iter()
            .map(|r| {
                vec![
                    r.item.clone(),
                    r.vague_count.to_string(),
                    r.not_vague_count.to_string(),
                ]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;

    fn config(drop_ties: bool) -> MatrixConfig {
        MatrixConfig {
            item_column: "req".into(),
            answer_column: "answer".into(),
            vague_answers: vec!["yes".into(), "unsure".into()],
            not_vague_answers: vec!["no".into()],
            drop_ties,
        }
    }

    fn table(rows: &[(&str, &str)]) -> Table {
        Table::new(
            vec!["req".into(), "answer".into()],
            rows.iter()
                .map(|(r, a)| vec![r.to_string(), a.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_unknown_answer_is_excluded() {
        let t = table(&[("A", "yes"), ("A", "unsure"), ("A", "banana")]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let cm = build_confusion_matrix(&t, &config(false), &mut sink).unwrap();
        assert_eq!(cm, vec![ConfusionRow::new("A", 2, 0)]);
        assert!(sink.contains(&Diagnostic::UnknownAnswer {
            item: "A".into(),
            answer: "banana".into()
        }));
    }

    #[test]
    fn test_groups_sorted_by_item() {
        let t = table(&[("B", "no"), ("A", "yes"), ("B", "yes"), ("A", "yes")]);
        let cm = build_confusion_matrix(&t, &config(false), &mut Vec::<Diagnostic>::new()).unwrap();
        assert_eq!(
            cm,
            vec![ConfusionRow::new("A", 2, 0), ConfusionRow::new("B", 1, 1)]
        );
    }

    #[test]
    fn test_drop_ties_removes_rows_and_reports() {
        let t = table(&[("A", "yes"), ("A", "no"), ("B", "no"), ("B", "no")]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let cm = build_confusion_matrix(&t, &config(true), &mut sink).unwrap();
        assert_eq!(cm, vec![ConfusionRow::new("B", 0, 2)]);
        assert!(sink.contains(&Diagnostic::DroppedTies { count: 1 }));
        assert!(sink.contains(&Diagnostic::MatrixSummary {
            retained: 1,
            grouped: 2,
            vague_votes: 0,
            not_vague_votes: 2,
        }));
    }

    #[test]
    fn test_keep_ties_by_default() {
        let t = table(&[("A", "yes"), ("A", "no")]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let cm = build_confusion_matrix(&t, &config(false), &mut sink).unwrap();
        assert_eq!(cm.len(), 1);
        assert!(!sink
            .iter()
            .any(|d| matches!(d, Diagnostic::DroppedTies { .. })));
    }

    #[test]
    fn test_item_with_only_unknown_answers_has_zero_counts() {
        let t = table(&[("A", "???")]);
        let cm = build_confusion_matrix(&t, &config(false), &mut Vec::<Diagnostic>::new()).unwrap();
        assert_eq!(cm, vec![ConfusionRow::new("A", 0, 0)]);
    }

    #[test]
    fn test_building_twice_is_identical() {
        let t = table(&[("C", "no"), ("A", "yes"), ("B", "yes"), ("A", "no"), ("C", "no")]);
        let first = build_confusion_matrix(&t, &config(false), &mut Vec::<Diagnostic>::new()).unwrap();
        let second = build_confusion_matrix(&t, &config(false), &mut Vec::<Diagnostic>::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            crate::table::write_csv_string(&confusion_table(&first), b',').unwrap(),
            crate::table::write_csv_string(&confusion_table(&second), b',').unwrap()
        );
    }

    #[test]
    fn test_missing_column() {
        let t = Table::new(vec!["req".into()], vec![vec!["A".into()]]);
        let err = build_confusion_matrix(&t, &config(false), &mut Vec::<Diagnostic>::new()).unwrap_err();
        assert_eq!(err, crate::error::StatsError::MissingColumn("answer".into()));
    }

    #[test]
    fn test_find_ties() {
        let t = table(&[("A", "yes"), ("A", "no"), ("B", "no"), ("C", "yes"), ("C", "no")]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let ties = find_ties(&t, &config(false), &mut sink).unwrap();
        assert_eq!(ties, vec!["A", "C"]);
        assert!(sink.contains(&Diagnostic::TiesFound { ties: 2, grouped: 3 }));

        let exported = ties_table(&ties, &config(false));
        assert_eq!(exported.columns(), &["req", "answer"]);
        assert_eq!(exported.rows()[1], vec!["C", ""]);
    }
}
