//! Inter-rater agreement: Fleiss' kappa and free-marginal kappa
//!
//! Both statistics share the observed agreement P:
//!
//! ```text
//! P_i = (Σ_c n_ci² − n) / (n · (n − 1))
//! P   = (1 / N) · Σ_i P_i
//! ```
//!
//! and differ only in the chance agreement P_E:
//!
//! ```text
//! Fleiss:        P_E = Σ_c (Σ_i n_ci / (n · N))²
//! Free-marginal: P_E = 1 / k
//! kappa          = (P − P_E) / (1 − P_E)
//! ```
//!
//! where n is the (constant) number of votes per item, N the number of items
//! and k the number of categories.
//!
//! # References
//!
//! - Fleiss (1971). "Measuring nominal scale agreement among many raters"
//! - Randolph (2005). "Free-Marginal Multirater Kappa"

use serde::Serialize;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{StatsError, StatsResult};
use crate::models::ConfusionRow;

/// Number of vote categories (vague, not vague)
pub const CATEGORY_COUNT: usize = 2;

/// Agreement statistics for one confusion matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementReport {
    pub items: usize,
    pub raters: u64,
    pub observed_agreement: f64,
    pub fleiss_kappa: f64,
    pub free_marginal_kappa: f64,
}

/// The shared number of votes per item.
///
/// Fails on an empty matrix, on fewer than two votes per item and when items
/// were rated by different numbers of raters.
pub fn rater_count(matrix: &[ConfusionRow]) -> StatsResult<u64> {
    let first = matrix.first().ok_or(StatsError::EmptyMatrix)?;
    let raters = first.total();

    if let Some(row) = matrix.iter().find(|r| r.total() != raters) {
        return Err(StatsError::InconsistentRaterCount {
            item: row.item.clone(),
            expected: raters,
            found: row.total(),
        });
    }
    if raters < 2 {
        return Err(StatsError::InsufficientRaters(raters));
    }
    Ok(raters)
}

/// Mean per-item agreement P
fn observed_agreement(matrix: &[ConfusionRow], raters: u64) -> f64 {
    let n = raters as f64;
    let sum: f64 = matrix
        .iter()
        .map(|row| {
            let squares: f64 = row.counts().iter().map(|&c| (c as f64).powi(2)).sum();
            (squares - n) / (n * (n - 1.0))
        })
        .sum();
    sum / matrix.len() as f64
}

/// Chance agreement from the observed category proportions
fn fleiss_chance_agreement(matrix: &[ConfusionRow], raters: u64) -> f64 {
    let total_votes = (raters * matrix.len() as u64) as f64;
    let mut per_category = [0u64; CATEGORY_COUNT];
    for row in matrix {
        for (acc, c) in per_category.iter_mut().zip(row.counts()) {
            *acc += c;
        }
    }
    per_category
        .iter()
        .map(|&c| (c as f64 / total_votes).powi(2))
        .sum()
}

fn kappa(observed: f64, chance: f64) -> StatsResult<f64> {
    let denominator = 1.0 - chance;
    if denominator == 0.0 {
        return Err(StatsError::DegenerateChanceAgreement);
    }
    Ok((observed - chance) / denominator)
}

/// Fleiss' kappa
pub fn fleiss_kappa(matrix: &[ConfusionRow], sink: &mut dyn DiagnosticSink) -> StatsResult<f64> {
    let raters = rater_count(matrix)?;
    sink.record(Diagnostic::RaterCount { raters });

    let observed = observed_agreement(matrix, raters);
    let chance = fleiss_chance_agreement(matrix, raters);
    kappa(observed, chance)
}

/// Free-marginal kappa: chance agreement fixed at 1 / k
pub fn free_marginal_kappa(
    matrix: &[ConfusionRow],
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<f64> {
    let raters = rater_count(matrix)?;
    sink.record(Diagnostic::RaterCount { raters });

    let observed = observed_agreement(matrix, raters);
    kappa(observed, 1.0 / CATEGORY_COUNT as f64)
}

/// Both kappas plus the observed agreement
pub fn agreement_report(
    matrix: &[ConfusionRow],
    sink: &mut dyn DiagnosticSink,
) -> StatsResult<AgreementReport> {
    let raters = rater_count(matrix)?;
    Ok(AgreementReport {
        items: matrix.len(),
        raters,
        observed_agreement: observed_agreement(matrix, raters),
        fleiss_kappa: fleiss_kappa(matrix, sink)?,
        free_marginal_kappa: free_marginal_kappa(matrix, sink)?,
    })
}
