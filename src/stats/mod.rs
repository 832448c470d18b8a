//! Statistics core
//!
//! Pure functions over in-memory tables. Nothing here touches the file
//! system or logs directly; non-fatal events go to a [`DiagnosticSink`].
//!
//! [`DiagnosticSink`]: crate::diagnostics::DiagnosticSink

pub mod confusion;
pub mod kappa;
pub mod majority;
pub mod metrics;
pub mod prediction;
pub mod ranking;

pub use confusion::{
    build_confusion_matrix, build_confusion_matrix_from_records, confusion_table, find_ties,
    labeled_records, ties_table,
};
pub use kappa::{agreement_report, fleiss_kappa, free_marginal_kappa, rater_count, AgreementReport};
pub use majority::{majority_label, majority_table, resolve_majority_labels};
pub use metrics::{
    accuracy, f1_score, false_negative_rate, false_positive_rate, precision, recall, specificity,
    ClassificationMetrics,
};
pub use prediction::{predict_with_threshold, probability_pairs_from_table, DEFAULT_VAGUE_THRESHOLD};
pub use ranking::{
    average_precision_at_k, mean_average_precision, scored_records_from_table,
    MeanAveragePrecision, ScoreColumns,
};
