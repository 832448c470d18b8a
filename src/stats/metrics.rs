//! Binary classification metrics over TP/TN/FP/FN counts
//!
//! A metric whose denominator is zero evaluates to `0.0` and is reported to
//! the diagnostic sink instead of producing NaN.

use serde::Serialize;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::models::ClassificationCounts;

fn quotient(
    metric: &'static str,
    numerator: u64,
    denominator: u64,
    sink: &mut dyn DiagnosticSink,
) -> f64 {
    if denominator == 0 {
        sink.record(Diagnostic::ZeroDenominator { metric });
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// (TP + TN) / total
pub fn accuracy(c: &ClassificationCounts, sink: &mut dyn DiagnosticSink) -> f64 {
    quotient("accuracy", c.true_positive + c.true_negative, c.total(), sink)
}

/// TP / (TP + FP)
pub fn precision(c: &ClassificationCounts, sink: &mut dyn DiagnosticSink) -> f64 {
    quotient(
        "precision",
        c.true_positive,
        c.true_positive + c.false_positive,
        sink,
    )
}

/// TP / (TP + FN)
pub fn recall(c: &ClassificationCounts, sink: &mut dyn DiagnosticSink) -> f64 {
    quotient(
        "recall",
        c.true_positive,
        c.true_positive + c.false_negative,
        sink,
    )
}

/// TN / (TN + FP)
pub fn specificity(c: &ClassificationCounts, sink: &mut dyn DiagnosticSink) -> f64 {
    quotient(
        "specificity",
        c.true_negative,
        c.true_negative + c.false_positive,
        sink,
    )
}

/// FN / (FN + TP)
pub fn false_negative_rate(c: &ClassificationCounts, sink: &mut dyn DiagnosticSink) -> f64 {
    quotient(
        "false_negative_rate",
        c.false_negative,
        c.false_negative + c.true_positive,
        sink,
    )
}

/// FP / (FP + TN)
pub fn false_positive_rate(c: &ClassificationCounts, sink: &mut dyn DiagnosticSink) -> f64 {
    quotient(
        "false_positive_rate",
        c.false_positive,
        c.false_positive + c.true_negative,
        sink,
    )
}

/// Harmonic mean of precision and recall
pub fn f1_score(c: &ClassificationCounts, sink: &mut dyn DiagnosticSink) -> f64 {
    let p = precision(c, sink);
    let r = recall(c, sink);
    if p + r == 0.0 {
        sink.record(Diagnostic::ZeroDenominator { metric: "f1_score" });
        return 0.0;
    }
    2.0 * p * r / (p + r)
}

/// Every metric for one set of counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    #[serde(flatten)]
    pub counts: ClassificationCounts,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub specificity: f64,
    pub false_negative_rate: f64,
    pub false_positive_rate: f64,
    pub f1_score: f64,
}

impl ClassificationMetrics {
    pub fn compute(counts: ClassificationCounts, sink: &mut dyn DiagnosticSink) -> Self {
        Self {
            accuracy: accuracy(&counts, sink),
            precision: precision(&counts, sink),
            recall: recall(&counts, sink),
            specificity: specificity(&counts, sink),
            false_negative_rate: false_negative_rate(&counts, sink),
            false_positive_rate: false_positive_rate(&counts, sink),
            f1_score: f1_score(&counts, sink),
            counts,
        }
    }

    /// Metric names and values in report order
    pub fn rows(&self) -> [(&'static str, f64); 7] {
        [
            ("accuracy", self.accuracy),
            ("precision", self.precision),
            ("recall", self.recall),
            ("specificity", self.specificity),
            ("false_negative_rate", self.false_negative_rate),
            ("false_positive_rate", self.false_positive_rate),
            ("f1_score", self.f1_score),
        ]
    }
}
