//! CLI command definitions and handlers

mod agreement;
mod compare;
mod corpus;
mod evaluate;
mod init;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use vaguereq::config::{load_project_config, ProjectConfig};
use vaguereq::table::{expand_glob, write_csv_file, write_csv_string, Table};

const FORMATS: [&str; 5] = ["text", "json", "csv", "markdown", "md"];

/// Parse and validate a batch size (at least 1)
fn parse_batch_size(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("batch size must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Parse and validate a probability threshold (0.0-1.0)
fn parse_threshold(s: &str) -> Result<f64, String> {
    let t: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if (0.0..=1.0).contains(&t) {
        Ok(t)
    } else {
        Err("threshold must be between 0 and 1".to_string())
    }
}

/// vaguereq - agreement and evaluation statistics for crowd-labeled
/// vague requirements
#[derive(Parser, Debug)]
#[command(name = "vaguereq")]
#[command(
    version,
    about = "Inter-rater agreement, majority labels and classification metrics for crowd-labeled requirements",
    long_about = "vaguereq reads crowd-sourcing batch results (one row per worker answer), \
tallies vague / not-vague votes per requirement, resolves majority labels and measures \
agreement with Fleiss' and free-marginal kappa. It also scores classifier output \
with threshold metrics and average precision.\n\n\
Column names and recognized answers are read from vaguereq.toml (see `vaguereq init`).",
    after_help = "\
Examples:
  vaguereq init                                   Write an example vaguereq.toml
  vaguereq kappa 'batches/*.csv'                  Agreement of all batches
  vaguereq majority 'batches/*.csv' -o labels.csv Majority label per requirement
  vaguereq evaluate labels.csv truth.csv          Metrics against ground truth
  vaguereq rank predictions.csv --format json     Mean average precision as JSON"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ./vaguereq.toml when present)
    #[arg(long, global = true, env = "VAGUEREQ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example vaguereq.toml
    Init {
        /// Directory to write the file to
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Fleiss' and free-marginal kappa of raw batch results
    #[command(after_help = "\
Examples:
  vaguereq kappa batch1.csv batch2.csv
  vaguereq kappa 'batches/*.csv' --drop-ties --matrix confusion_matrix.csv
  vaguereq kappa 'batches/*.csv' --format markdown")]
    Kappa {
        /// Input files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Drop requirements with tied votes before computing
        #[arg(long)]
        drop_ties: bool,

        /// Also write the confusion matrix to this file
        #[arg(long)]
        matrix: Option<PathBuf>,

        /// Output format: text, json, csv, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = FORMATS)]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Majority label per requirement
    #[command(after_help = "\
Examples:
  vaguereq majority 'batches/*.csv' -o majority_label.csv
  vaguereq majority batch.csv --drop-ties --prefer-not-vague")]
    Majority {
        /// Input files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Drop requirements with tied votes
        #[arg(long)]
        drop_ties: bool,

        /// Resolve tied votes as "not vague" (overrides the config)
        #[arg(long)]
        prefer_not_vague: bool,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List requirements with tied votes
    Ties {
        /// Input files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Compare the majority labels of two batch groups
    #[command(after_help = "\
Examples:
  vaguereq compare --first crowd/*.csv --second expert.csv
  vaguereq compare --first a.csv b.csv --second c.csv --drop-ties
  vaguereq compare --first a.csv --second b.csv --prefer-not-vague")]
    Compare {
        /// First group: files or glob patterns
        #[arg(long, required = true, num_args = 1..)]
        first: Vec<String>,

        /// Second group: files or glob patterns
        #[arg(long, required = true, num_args = 1..)]
        second: Vec<String>,

        /// Drop tied requirements inside each group
        #[arg(long)]
        drop_ties: bool,

        /// Resolve tied votes inside each group as "not vague" (overrides the config)
        #[arg(long)]
        prefer_not_vague: bool,

        /// Output format: text, json, csv, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = FORMATS)]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Classification metrics of assigned labels against ground truth
    #[command(after_help = "\
Examples:
  vaguereq evaluate majority_label.csv truth.csv
  vaguereq evaluate labels.csv truth.csv --label-column 'majority label' --format csv")]
    Evaluate {
        /// Labeled file
        labeled: PathBuf,

        /// Ground-truth file
        truth: PathBuf,

        /// Item column shared by both files
        #[arg(long, default_value = "requirement")]
        item_column: String,

        /// Assigned label column (1, 0 or -1 for "cannot decide")
        #[arg(long, default_value = "majority_label")]
        label_column: String,

        /// Ground-truth label column
        #[arg(long, default_value = "vague")]
        truth_column: String,

        /// Output format: text, json, csv, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = FORMATS)]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Average precision of classifier probabilities
    #[command(after_help = "\
Examples:
  vaguereq rank predictions.csv                   MAP over both classes
  vaguereq rank predictions.csv --query vague -k 50")]
    Rank {
        /// File with probability and ground-truth columns
        input: PathBuf,

        /// Only compute AP@k for this class
        #[arg(long, value_parser = ["vague", "not-vague"])]
        query: Option<String>,

        /// Cutoff (default: all rows)
        #[arg(short = 'k', long)]
        k: Option<usize>,

        #[arg(long, default_value = "vague_prob")]
        vague_column: String,

        #[arg(long, default_value = "not_vague_prob")]
        not_vague_column: String,

        #[arg(long, default_value = "majority_label")]
        truth_column: String,

        /// Output format: text, json, csv, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = FORMATS)]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Label rows by thresholding the vague probability
    Predict {
        /// File with probability columns
        input: PathBuf,

        /// Minimum vague probability for a "vague" label
        #[arg(long, default_value = "0.5", value_parser = parse_threshold)]
        threshold: f64,

        #[arg(long, default_value = "vague_prob")]
        vague_column: String,

        #[arg(long, default_value = "not_vague_prob")]
        not_vague_column: String,

        /// Name of the added column
        #[arg(long, default_value = "prediction")]
        column: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Count words of vague and not-vague requirements
    Words {
        /// Majority-labeled files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Aggregate grid-search evaluation files
    #[command(after_help = "\
Examples:
  vaguereq grid-search 'runs/**/*evaluation.json' --metric recall --best 10")]
    GridSearch {
        /// Glob pattern of evaluation JSON files
        pattern: String,

        /// Metric to rank by
        #[arg(long, default_value = "recall")]
        metric: String,

        /// Keep only the best N entries
        #[arg(long)]
        best: Option<usize>,

        /// Output delimiter
        #[arg(long, default_value = ";")]
        delimiter: char,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Slice a raw corpus into batches of requirements for labeling
    Slice {
        /// Raw corpus with `sentence` and `label` columns
        corpus: PathBuf,

        /// Requirements per batch
        #[arg(long, default_value = "100", value_parser = parse_batch_size)]
        batch_size: usize,

        /// Directory for corpus-batch-{k}.csv files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Delimiter of the corpus and the batch files
        #[arg(long, default_value = ";")]
        delimiter: char,
    },

    /// Rewrite files in place with another delimiter
    Reformat {
        /// Glob pattern of files to rewrite
        pattern: String,

        /// Current delimiter
        #[arg(long, default_value = ";")]
        from: char,

        /// New delimiter
        #[arg(long, default_value = ",")]
        to: char,
    },
}

/// Run the parsed command
pub fn run(cli: Cli) -> Result<()> {
    let config = match cli.command {
        Commands::Init { .. } => ProjectConfig::default(),
        _ => {
            let cwd = std::env::current_dir().context("Failed to determine working directory")?;
            load_project_config(cli.config.as_deref(), &cwd)?
        }
    };

    match cli.command {
        Commands::Init { dir, force } => init::run(&dir, force),
        Commands::Kappa {
            inputs,
            drop_ties,
            matrix,
            format,
            output,
        } => agreement::kappa(&config, &inputs, drop_ties, matrix.as_deref(), &format, output.as_deref()),
        Commands::Majority {
            inputs,
            drop_ties,
            prefer_not_vague,
            output,
        } => agreement::majority(&config, &inputs, drop_ties, prefer_not_vague, output.as_deref()),
        Commands::Ties { inputs, output } => agreement::ties(&config, &inputs, output.as_deref()),
        Commands::Compare {
            first,
            second,
            drop_ties,
            prefer_not_vague,
            format,
            output,
        } => compare::run(
            &config,
            &[first, second],
            drop_ties,
            prefer_not_vague,
            &format,
            output.as_deref(),
        ),
        Commands::Evaluate {
            labeled,
            truth,
            item_column,
            label_column,
            truth_column,
            format,
            output,
        } => evaluate::evaluate(
            &config,
            &labeled,
            &truth,
            vaguereq::tools::EvaluationColumns {
                item: item_column,
                label: label_column,
                truth: truth_column,
            },
            &format,
            output.as_deref(),
        ),
        Commands::Rank {
            input,
            query,
            k,
            vague_column,
            not_vague_column,
            truth_column,
            format,
            output,
        } => evaluate::rank(
            &config,
            &input,
            query.as_deref(),
            k,
            vaguereq::stats::ScoreColumns {
                vague_probability: vague_column,
                not_vague_probability: not_vague_column,
                ground_truth: truth_column,
            },
            &format,
            output.as_deref(),
        ),
        Commands::Predict {
            input,
            threshold,
            vague_column,
            not_vague_column,
            column,
            output,
        } => evaluate::predict(
            &config,
            &input,
            threshold,
            (vague_column.as_str(), not_vague_column.as_str()),
            &column,
            output.as_deref(),
        ),
        Commands::Words { inputs, output } => corpus::words(&config, &inputs, output.as_deref()),
        Commands::GridSearch {
            pattern,
            metric,
            best,
            delimiter,
            output,
        } => corpus::grid_search(&pattern, &metric, best, delimiter, output.as_deref()),
        Commands::Slice {
            corpus: corpus_path,
            batch_size,
            out_dir,
            delimiter,
        } => corpus::slice(&corpus_path, batch_size, &out_dir, delimiter),
        Commands::Reformat { pattern, from, to } => corpus::reformat(&pattern, from, to),
    }
}

/// Expand every argument as a glob pattern.
///
/// An argument that matches nothing is an error, so a typo never silently
/// shrinks the input.
fn resolve_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let matched = expand_glob(input)?;
        if matched.is_empty() {
            anyhow::bail!("No files match {input}");
        }
        debug!("{} matched {} file(s)", input, matched.len());
        paths.extend(matched);
    }
    Ok(paths)
}

/// Write text to a file, or stdout when no path is given
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Write a table as CSV to a file, or stdout when no path is given
fn emit_table(table: &Table, config: &ProjectConfig, output: Option<&Path>) -> Result<()> {
    let delimiter = config.output_delimiter()?;
    match output {
        Some(path) => {
            write_csv_file(table, path, delimiter)?;
            eprintln!("Wrote {} rows to: {}", table.len(), path.display());
            Ok(())
        }
        None => {
            print!("{}", write_csv_string(table, delimiter)?);
            Ok(())
        }
    }
}
