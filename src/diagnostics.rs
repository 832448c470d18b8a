//! Diagnostics reported by the statistics core
//!
//! The core never logs directly. Each operation takes a
//! `&mut dyn DiagnosticSink` and reports what it tolerated or counted.
//! [`TracingSink`] forwards events to the log stream; a `Vec<Diagnostic>`
//! collects them, which is what the tests use.

use serde::Serialize;
use tracing::{debug, info, warn};

/// A structured, non-fatal event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An answer matched neither vote set and was ignored
    UnknownAnswer { item: String, answer: String },
    /// Tied items removed from a confusion matrix
    DroppedTies { count: usize },
    /// Summary of a built confusion matrix
    MatrixSummary {
        retained: usize,
        grouped: usize,
        vague_votes: u64,
        not_vague_votes: u64,
    },
    /// Tied items found while scanning for ties
    TiesFound { ties: usize, grouped: usize },
    /// Label distribution after majority resolution
    MajoritySummary { vague: usize, not_vague: usize },
    /// Votes per item used by the agreement statistics
    RaterCount { raters: u64 },
    /// A metric's denominator was zero and the metric was set to 0
    ZeroDenominator { metric: &'static str },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAnswer { item, answer } => {
                write!(f, "Found unknown answer=\"{answer}\" for requirement=\"{item}\".")
            }
            Self::DroppedTies { count } => write!(f, "Dropped {count} requirements due to ties."),
            Self::MatrixSummary {
                retained,
                grouped,
                vague_votes,
                not_vague_votes,
            } => write!(
                f,
                "Built confusion matrix including {retained} of {grouped} requirements. \
                 Overall \"vague\" votes count = {vague_votes}. \
                 Overall \"not vague\" votes count = {not_vague_votes}."
            ),
            Self::TiesFound { ties, grouped } => {
                write!(f, "Found {ties} of {grouped} requirements with ties in votes.")
            }
            Self::MajoritySummary { vague, not_vague } => write!(
                f,
                "\"vague\" majority label count = {vague}. \"not vague\" majority label count = {not_vague}."
            ),
            Self::RaterCount { raters } => {
                write!(f, "Each requirement was labeled by {raters} workers.")
            }
            Self::ZeroDenominator { metric } => write!(
                f,
                "Denominator = 0 for {metric}. Skip metric calculation and set it to value=\"0\"."
            ),
        }
    }
}

/// Receiver for diagnostics emitted by the core
pub trait DiagnosticSink {
    fn record(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnknownAnswer { .. } | Diagnostic::ZeroDenominator { .. } => {
                warn!("{}", diagnostic)
            }
            Diagnostic::RaterCount { .. } => debug!("{}", diagnostic),
            _ => info!("{}", diagnostic),
        }
    }
}
