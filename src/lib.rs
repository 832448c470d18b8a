//! vaguereq - agreement and evaluation statistics for crowd-labeled
//! vague requirements
//!
//! Turns raw crowd-sourcing batches (one row per worker answer) into
//! per-requirement vote tallies, resolves majority labels, measures
//! inter-rater agreement with Fleiss' and free-marginal kappa, and scores
//! classifiers with threshold metrics and average precision.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod reporters;
pub mod stats;
pub mod table;
pub mod tools;

pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{StatsError, StatsResult};
