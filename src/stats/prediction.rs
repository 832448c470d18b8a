//! Threshold prediction from classifier probabilities

use crate::error::StatsResult;
use crate::models::Label;
use crate::stats::ranking::parse_probability;
use crate::table::Table;

/// Default decision threshold for the vague class
pub const DEFAULT_VAGUE_THRESHOLD: f64 = 0.5;

/// Label each probability pair.
///
/// Pairs are `(not_vague_probability, vague_probability)`, the column order
/// classifiers emit. A pair is `Vague` when its vague probability reaches the
/// threshold.
pub fn predict_with_threshold(probabilities: &[(f64, f64)], vague_threshold: f64) -> Vec<Label> {
    probabilities
        .iter()
        .map(|&(_, vague)| {
            if vague >= vague_threshold {
                Label::Vague
            } else {
                Label::NotVague
            }
        })
        .collect()
}

/// Read `(not_vague, vague)` probability pairs from two table columns
pub fn probability_pairs_from_table(
    table: &Table,
    vague_column: &str,
    not_vague_column: &str,
) -> StatsResult<Vec<(f64, f64)>> {
    let vague_idx = table.require_column(vague_column)?;
    let not_vague_idx = table.require_column(not_vague_column)?;
    table
        .rows()
        .iter()
        .map(|row| {
            Ok((
                parse_probability(not_vague_column, &row[not_vague_idx])?,
                parse_probability(vague_column, &row[vague_idx])?,
            ))
        })
        .collect()
}
