//! Core data models for vaguereq
//!
//! Value types shared by the loader, the statistics engines and the
//! reporters. None of them are mutated after construction; every pipeline
//! step returns a new collection.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Column name of the item identifier in exported confusion matrices
pub const CM_REQUIREMENT_COLUMN: &str = "requirement";
/// Column name of the vague vote count
pub const CM_VAGUE_COUNT_COLUMN: &str = "vague_count";
/// Column name of the not-vague vote count
pub const CM_NOT_VAGUE_COUNT_COLUMN: &str = "not_vague_count";
/// Column name of the resolved majority label
pub const MAJORITY_LABEL_COLUMN: &str = "majority_label";

/// Binary decision label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    NotVague = 0,
    Vague = 1,
}

impl Label {
    /// Numeric value as written to tables (1 = vague, 0 = not vague)
    pub fn value(self) -> u8 {
        self as u8
    }

    /// The opposite class
    pub fn other(self) -> Self {
        match self {
            Label::Vague => Label::NotVague,
            Label::NotVague => Label::Vague,
        }
    }

    /// Parse a label cell.
    ///
    /// Accepts `"1"`/`"0"` and integral float text such as `"1.0"`, which
    /// spreadsheet round-trips tend to produce.
    pub fn parse(raw: &str) -> StatsResult<Self> {
        match parse_integral(raw) {
            Some(1) => Ok(Label::Vague),
            Some(0) => Ok(Label::NotVague),
            _ => Err(StatsError::UnsupportedLabel(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Vague => write!(f, "vague"),
            Label::NotVague => write!(f, "not_vague"),
        }
    }
}

/// Parse integer text, tolerating a trailing `.0`
pub(crate) fn parse_integral(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.fract() == 0.0 && v.is_finite())
        .map(|v| v as i64)
}

/// One rater's answer for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRecord {
    pub item: String,
    pub answer: String,
}

/// Per-item vote tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionRow {
    pub item: String,
    pub vague_count: u64,
    pub not_vague_count: u64,
}

impl ConfusionRow {
    pub fn new(item: impl Into<String>, vague_count: u64, not_vague_count: u64) -> Self {
        Self {
            item: item.into(),
            vague_count,
            not_vague_count,
        }
    }

    /// Number of valid votes for this item
    pub fn total(&self) -> u64 {
        self.vague_count + self.not_vague_count
    }

    pub fn is_tie(&self) -> bool {
        self.vague_count == self.not_vague_count
    }

    /// True when every valid vote went to the same category
    pub fn is_unanimous(&self) -> bool {
        self.vague_count == 0 || self.not_vague_count == 0
    }

    /// Category counts in fixed order (vague, not vague)
    pub fn counts(&self) -> [u64; 2] {
        [self.vague_count, self.not_vague_count]
    }
}

/// Confusion row annotated with its resolved label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityLabeledRow {
    #[serde(flatten)]
    pub row: ConfusionRow,
    pub majority_label: Label,
}

/// Aggregate TP/TN/FP/FN summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl ClassificationCounts {
    pub fn new(true_positive: u64, true_negative: u64, false_positive: u64, false_negative: u64) -> Self {
        Self {
            true_positive,
            true_negative,
            false_positive,
            false_negative,
        }
    }

    /// Tally (assigned, truth) label pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Label, Label)>,
    {
        let mut counts = Self::default();
        for (assigned, truth) in pairs {
            counts.record(assigned, truth);
        }
        counts
    }

    fn record(&mut self, assigned: Label, truth: Label) {
        match (assigned, assigned == truth) {
            (Label::Vague, true) => self.true_positive += 1,
            (Label::Vague, false) => self.false_positive += 1,
            (Label::NotVague, true) => self.true_negative += 1,
            (Label::NotVague, false) => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }
}

/// A record carrying classifier probabilities and its ground truth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub item: String,
    pub vague_probability: f64,
    pub not_vague_probability: f64,
    pub ground_truth: Label,
}

impl ScoredRecord {
    /// Classifier probability of `label`
    pub fn probability(&self, label: Label) -> f64 {
        match label {
            Label::Vague => self.vague_probability,
            Label::NotVague => self.not_vague_probability,
        }
    }

    /// Probability for `query` followed by the probability of the other class
    pub fn probabilities_for(&self, query: Label) -> (f64, f64) {
        (self.probability(query), self.probability(query.other()))
    }
}
