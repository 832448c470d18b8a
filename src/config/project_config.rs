//! Project-level configuration support
//!
//! Loads per-project configuration from `vaguereq.toml` in the working
//! directory, or from the file passed with `--config`.
//!
//! # Configuration Format
//!
//! ```toml
//! # vaguereq.toml
//!
//! [input]
//! delimiter = ","
//! item_column = "Input.requirement"
//! answer_column = "Answer.vague-requirement.label"
//!
//! [votes]
//! vague = ["1 - Yes, it is vague", "3 - Cannot decide"]
//! not_vague = ["2 - No, it is not vague"]
//!
//! [majority]
//! prefer_vague = true
//!
//! [output]
//! delimiter = ","
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "vaguereq.toml";

/// Item column of a crowd-sourcing batch result
pub const DEFAULT_ITEM_COLUMN: &str = "Input.requirement";
/// Answer column of a crowd-sourcing batch result
pub const DEFAULT_ANSWER_COLUMN: &str = "Answer.vague-requirement.label";

/// Answers counted as a "vague" vote. "Cannot decide" counts as vague.
pub const DEFAULT_VAGUE_ANSWERS: &[&str] = &[
    "1 - Yes, it is vague",
    "1 - Yes, contains vague words",
    "3 - Cannot decide",
];
/// Answers counted as a "not vague" vote
pub const DEFAULT_NOT_VAGUE_ANSWERS: &[&str] =
    &["2 - No, it is not vague", "2 - No, contains no vague words"];

/// Example file written by `vaguereq init`
pub const EXAMPLE_CONFIG: &str = r#"# vaguereq configuration

[input]
# Column delimiter of input batches
delimiter = ","
# Column holding the labeled requirement
item_column = "Input.requirement"
# Column holding each worker's answer
# (the legacy "Answer.vague-words.label" column is renamed to this on load)
answer_column = "Answer.vague-requirement.label"

[votes]
# Answers counted as a "vague" vote
vague = ["1 - Yes, it is vague", "1 - Yes, contains vague words", "3 - Cannot decide"]
# Answers counted as a "not vague" vote. Anything else is reported and ignored.
not_vague = ["2 - No, it is not vague", "2 - No, contains no vague words"]

[majority]
# Label assigned when votes are tied
prefer_vague = true

[output]
# Column delimiter of exported tables
delimiter = ","
"#;

/// Complete project configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub votes: VoteConfig,
    #[serde(default)]
    pub majority: MajorityConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: char,
    pub item_column: String,
    pub answer_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            item_column: DEFAULT_ITEM_COLUMN.to_string(),
            answer_column: DEFAULT_ANSWER_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VoteConfig {
    pub vague: Vec<String>,
    pub not_vague: Vec<String>,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            vague: DEFAULT_VAGUE_ANSWERS.iter().map(|s| s.to_string()).collect(),
            not_vague: DEFAULT_NOT_VAGUE_ANSWERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MajorityConfig {
    pub prefer_vague: bool,
}

impl Default for MajorityConfig {
    fn default() -> Self {
        Self { prefer_vague: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl ProjectConfig {
    /// Settings for one confusion-matrix build
    pub fn matrix_config(&self, drop_ties: bool) -> MatrixConfig {
        MatrixConfig {
            item_column: self.input.item_column.clone(),
            answer_column: self.input.answer_column.clone(),
            vague_answers: self.votes.vague.clone(),
            not_vague_answers: self.votes.not_vague.clone(),
            drop_ties,
        }
    }

    pub fn input_delimiter(&self) -> Result<u8> {
        delimiter_byte(self.input.delimiter)
    }

    pub fn output_delimiter(&self) -> Result<u8> {
        delimiter_byte(self.output.delimiter)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<()> {
        self.input_delimiter()?;
        self.output_delimiter()?;
        if let Some(answer) = self
            .votes
            .vague
            .iter()
            .find(|a| self.votes.not_vague.contains(a))
        {
            anyhow::bail!("Answer \"{answer}\" is listed as both vague and not vague");
        }
        Ok(())
    }
}

/// Convert a configured delimiter to the byte the CSV layer expects
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        anyhow::bail!("Delimiter '{delimiter}' is not a single ASCII character")
    }
}

/// Immutable settings for building a confusion matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixConfig {
    pub item_column: String,
    pub answer_column: String,
    pub vague_answers: Vec<String>,
    pub not_vague_answers: Vec<String>,
    pub drop_ties: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        ProjectConfig::default().matrix_config(false)
    }
}

impl MatrixConfig {
    /// Settings for a table whose answers are already 1/0 labels
    pub fn for_labels(item_column: &str, label_column: &str, drop_ties: bool) -> Self {
        Self {
            item_column: item_column.to_string(),
            answer_column: label_column.to_string(),
            vague_answers: vec!["1".to_string()],
            not_vague_answers: vec!["0".to_string()],
            drop_ties,
        }
    }
}

/// Load the project configuration.
///
/// An explicit path must exist and parse. Otherwise `vaguereq.toml` in `dir`
/// is tried; a broken file there is logged and defaults are used.
pub fn load_project_config(explicit: Option<&Path>, dir: &Path) -> Result<ProjectConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        debug!("Loaded project config from {}", path.display());
        return Ok(config);
    }

    let toml_path = dir.join(CONFIG_FILE_NAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    Ok(ProjectConfig::default())
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: ProjectConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, ProjectConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let parsed: ProjectConfig = toml::from_str(
            r#"
[input]
delimiter = ";"

[majority]
prefer_vague = false
"#,
        )
        .unwrap();
        assert_eq!(parsed.input_delimiter().unwrap(), b';');
        assert_eq!(parsed.input.item_column, DEFAULT_ITEM_COLUMN);
        assert!(!parsed.majority.prefer_vague);
        assert_eq!(parsed.votes, VoteConfig::default());
    }

    #[test]
    fn test_overlapping_votes_rejected() {
        let config = ProjectConfig {
            votes: VoteConfig {
                vague: vec!["x".into()],
                not_vague: vec!["x".into()],
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(delimiter_byte('§').is_err());
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
    }

    #[test]
    fn test_load_from_directory_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_project_config(None, dir.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[output]\ndelimiter = \"\\t\"\n",
        )
        .unwrap();
        let config = load_project_config(None, dir.path()).unwrap();
        assert_eq!(config.output_delimiter().unwrap(), b'\t');

        // Broken implicit file falls back to defaults
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[output\n").unwrap();
        let config = load_project_config(None, dir.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("other.toml");
        assert!(load_project_config(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_matrix_config_for_labels() {
        let cfg = MatrixConfig::for_labels("requirement", "majority_label", true);
        assert_eq!(cfg.vague_answers, vec!["1"]);
        assert!(cfg.drop_ties);
    }
}
