//! Higher-level workflows built on the statistics core

pub mod compare;
pub mod corpus;
pub mod evaluate;
pub mod grid_search;
pub mod words;

pub use compare::{compare_groups, ComparisonReport};
pub use corpus::{reformat_files, slice_corpus, write_batches};
pub use evaluate::{evaluate_labels, EvaluationColumns};
pub use grid_search::{grid_search_table, load_evaluations, rank_entries, GridSearchEntry};
pub use words::{count_words, word_count_table, WordCount};
