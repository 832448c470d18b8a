//! Error types for the statistics core
//!
//! Only fatal conditions live here. Tolerated conditions (unknown answers,
//! zero denominators, dropped ties) are reported through
//! [`crate::diagnostics::DiagnosticSink`] and never become errors.

use thiserror::Error;

/// Errors that halt a statistics computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("The raters count is inconsistent: item \"{item}\" has {found} votes, expected {expected}")]
    InconsistentRaterCount {
        item: String,
        expected: u64,
        found: u64,
    },

    #[error("Confusion matrix is empty")]
    EmptyMatrix,

    #[error("At least 2 raters per item are required, found {0}")]
    InsufficientRaters(u64),

    #[error("Chance agreement is 1, kappa is undefined")]
    DegenerateChanceAgreement,

    #[error("Cannot handle tie: item \"{item}\" has equal probabilities ({probability})")]
    ProbabilityTie { item: String, probability: f64 },

    #[error("Detected unsupported label=\"{0}\"")]
    UnsupportedLabel(String),

    #[error("Missing column \"{0}\"")]
    MissingColumn(String),

    #[error("No ground truth found for item \"{0}\"")]
    MissingTruth(String),

    #[error("Cannot parse probability \"{value}\" in column \"{column}\"")]
    InvalidProbability { column: String, value: String },
}

pub type StatsResult<T> = Result<T, StatsError>;
