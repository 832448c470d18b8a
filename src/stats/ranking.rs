//! Ranking quality: average precision @ k and mean average precision
//!
//! Records are ranked by the probability of the queried class. A ranked row
//! is a hit when the queried class wins the comparison against the other
//! class and matches the ground truth; AP@k is the mean of the running
//! precision at every hit.

use serde::Serialize;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{StatsError, StatsResult};
use crate::models::{Label, ScoredRecord, CM_REQUIREMENT_COLUMN, MAJORITY_LABEL_COLUMN};
use crate::table::Table;

/// Default column holding the vague probability
pub const VAGUE_PROB_COLUMN: &str = "vague_prob";
/// Default column holding the not-vague probability
pub const NOT_VAGUE_PROB_COLUMN: &str = "not_vague_prob";

/// Column names of a scored table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreColumns {
    pub vague_probability: String,
    pub not_vague_probability: String,
    pub ground_truth: String,
}

impl Default for ScoreColumns {
    fn default() -> Self {
        Self {
            vague_probability: VAGUE_PROB_COLUMN.to_string(),
            not_vague_probability: NOT_VAGUE_PROB_COLUMN.to_string(),
            ground_truth: MAJORITY_LABEL_COLUMN.to_string(),
        }
    }
}

/// Average precision for both classes and their mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanAveragePrecision {
    pub mean: f64,
    pub vague: f64,
    pub not_vague: f64,
}

pub(crate) fn parse_probability(column: &str, raw: &str) -> StatsResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| StatsError::InvalidProbability {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Read scored records from a table.
///
/// The item identifier is taken from the `requirement` column when present,
/// otherwise the row number is used.
pub fn scored_records_from_table(
    table: &Table,
    columns: &ScoreColumns,
) -> StatsResult<Vec<ScoredRecord>> {
    let vague_idx = table.require_column(&columns.vague_probability)?;
    let not_vague_idx = table.require_column(&columns.not_vague_probability)?;
    let truth_idx = table.require_column(&columns.ground_truth)?;
    let item_idx = table.column_index(CM_REQUIREMENT_COLUMN);

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(ScoredRecord {
                item: item_idx.map_or_else(|| i.to_string(), |idx| row[idx].clone()),
                vague_probability: parse_probability(&columns.vague_probability, &row[vague_idx])?,
                not_vague_probability: parse_probability(
                    &columns.not_vague_probability,
                    &row[not_vague_idx],
                )?,
                ground_truth: Label::parse(&row[truth_idx])?,
            })
        })
        .collect()
}

/// Average precision @ k for one query class.
///
/// `k` defaults to, and is capped at, the number of records. A row inside the
/// cutoff whose two probabilities are equal cannot be ranked and is an error.
pub fn average_precision_at_k(
    records: &[ScoredRecord],
    query: Label,
    k: Option<usize>,
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<f64> {
    let k = k.map_or(records.len(), |k| k.min(records.len()));

    let mut ranked: Vec<&ScoredRecord> = records.iter().collect();
    // sort_by is stable: equal probabilities keep input order
    ranked.sort_by(|a, b| {
        let (pa, _) = a.probabilities_for(query);
        let (pb, _) = b.probabilities_for(query);
        pb.total_cmp(&pa)
    });

    let mut hits = 0u64;
    let mut score = 0.0;
    for (index, record) in ranked.iter().take(k).enumerate() {
        let (queried, other) = record.probabilities_for(query);
        if queried == other {
            return Err(StatsError::ProbabilityTie {
                item: record.item.clone(),
                probability: queried,
            });
        }
        if queried > other && record.ground_truth == query {
            hits += 1;
            score += hits as f64 / (index + 1) as f64;
        }
    }

    if hits == 0 {
        sink.record(Diagnostic::ZeroDenominator {
            metric: "average_precision",
        });
        return Ok(0.0);
    }
    Ok(score / hits as f64)
}

/// AP over all records for both classes and their arithmetic mean
pub fn mean_average_precision(
    records: &[ScoredRecord],
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<MeanAveragePrecision> {
    let vague = average_precision_at_k(records, Label::Vague, None, sink)?;
    let not_vague = average_precision_at_k(records, Label::NotVague, None, sink)?;
    Ok(MeanAveragePrecision {
        mean: (vague + not_vague) / 2.0,
        vague,
        not_vague,
    })
}
