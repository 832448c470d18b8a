//! Word frequencies of vague vs. not-vague requirements

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::StatsResult;
use crate::models::{Label, CM_REQUIREMENT_COLUMN, MAJORITY_LABEL_COLUMN};
use crate::table::Table;

/// Per-token counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub overall: u64,
    pub vague: u64,
    pub not_vague: u64,
}

impl WordCount {
    /// Absolute gap between the class counts
    pub fn difference(&self) -> u64 {
        self.vague.abs_diff(self.not_vague)
    }
}

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\w+|[^\w\s]").expect("valid regex"))
}

/// Split text into word tokens and single punctuation characters
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    token_pattern().find_iter(text).map(|m| m.as_str())
}

/// Count tokens of every row of the given majority-labeled tables.
///
/// Sorted by overall count, most frequent first, then by word.
pub fn count_words<'a, I>(tables: I) -> StatsResult<Vec<WordCount>>
where
    I: IntoIterator<Item = &'a Table>,
{
    let mut counts: HashMap<String, WordCount> = HashMap::new();

    for table in tables {
        let text_idx = table.require_column(CM_REQUIREMENT_COLUMN)?;
        let label_idx = table.require_column(MAJORITY_LABEL_COLUMN)?;
        for row in table.rows() {
            let label = Label::parse(&row[label_idx])?;
            for token in tokenize(&row[text_idx]) {
                let entry = counts
                    .entry(token.to_string())
                    .or_insert_with(|| WordCount {
                        word: token.to_string(),
                        overall: 0,
                        vague: 0,
                        not_vague: 0,
                    });
                entry.overall += 1;
                match label {
                    Label::Vague => entry.vague += 1,
                    Label::NotVague => entry.not_vague += 1,
                }
            }
        }
    }

    let mut words: Vec<WordCount> = counts.into_values().collect();
    words.sort_by(|a, b| b.overall.cmp(&a.overall).then_with(|| a.word.cmp(&b.word)));
    Ok(words)
}

/// Export word counts as a table
pub fn word_count_table(words: &[WordCount]) -> Table {
    Table::new(
        ["word", "overall_count", "vague_count", "not_vague_count", "difference"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        words
            .iter()
            .map(|w| {
                vec![
                    w.word.clone(),
                    w.overall.to_string(),
                    w.vague.to_string(),
                    w.not_vague.to_string(),
                    w.difference().to_string(),
                ]
            })
            .collect(),
    )
}
