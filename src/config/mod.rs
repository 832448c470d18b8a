//! Configuration module for vaguereq
//!
//! This module handles:
//! - Project-level configuration (vaguereq.toml)
//! - Column names and recognized vote labels of crowd-sourced batches
//! - Per-call immutable settings for the statistics core

mod project_config;

pub use project_config::{
    delimiter_byte, load_project_config, InputConfig, MajorityConfig, MatrixConfig, OutputConfig, ProjectConfig,
    VoteConfig, CONFIG_FILE_NAME, DEFAULT_ANSWER_COLUMN, DEFAULT_ITEM_COLUMN,
    DEFAULT_NOT_VAGUE_ANSWERS, DEFAULT_VAGUE_ANSWERS, EXAMPLE_CONFIG,
};
