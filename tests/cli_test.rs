//! End-to-end tests for the vaguereq binary
//!
//! Each test writes its fixtures into its own temp directory and runs the
//! built binary there, so no vaguereq.toml from the source tree is picked up.

use std::path::Path;
use std::process::{Command, Output};

fn vaguereq_bin() -> String {
    env!("CARGO_BIN_EXE_vaguereq").to_string()
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(vaguereq_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("VAGUEREQ_CONFIG")
        .output()
        .expect("Failed to run vaguereq")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// Answer fields as they appear in a batch file; the answers contain commas
const VAGUE: &str = "\"1 - Yes, it is vague\"";
const NOT_VAGUE: &str = "\"2 - No, it is not vague\"";

/// Three answers per requirement, split over a current and a legacy export
fn write_batches(dir: &Path) {
    let mut current = String::from("Input.requirement,Answer.vague-requirement.label\n");
    for (item, answer) in [
        ("R1", VAGUE),
        ("R1", VAGUE),
        ("R2", NOT_VAGUE),
        ("R2", NOT_VAGUE),
        ("R3", VAGUE),
        ("R3", VAGUE),
        ("R3", "maybe"),
        ("R4", VAGUE),
        ("R4", NOT_VAGUE),
    ] {
        current.push_str(&format!("{item},{answer}\n"));
    }
    std::fs::write(dir.join("batch-1.csv"), current).unwrap();

    let legacy = format!(
        "Input.requirement,Answer.vague-words.label\nR1,{VAGUE}\nR2,{NOT_VAGUE}\nR3,{NOT_VAGUE}\nR4,{NOT_VAGUE}\n"
    );
    std::fs::write(dir.join("batch-2.csv"), legacy).unwrap();
}

#[test]
fn test_kappa_json_report() {
    let dir = tempfile::tempdir().unwrap();
    write_batches(dir.path());

    let output = run(dir.path(), &["kappa", "batch-*.csv", "--format", "json"]);
    assert!(output.status.success(), "{:?}", output);

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON report");
    assert_eq!(report["items"], 4);
    assert_eq!(report["raters"], 3);
    // P = 2/3, base rates 1/2 each
    let fleiss = report["fleiss_kappa"].as_f64().unwrap();
    let free = report["free_marginal_kappa"].as_f64().unwrap();
    assert!((fleiss - 1.0 / 3.0).abs() < 1e-9);
    assert!((free - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_kappa_writes_confusion_matrix() {
    let dir = tempfile::tempdir().unwrap();
    write_batches(dir.path());

    let output = run(
        dir.path(),
        &["kappa", "batch-1.csv", "batch-2.csv", "--matrix", "out/matrix.csv"],
    );
    assert!(output.status.success(), "{:?}", output);

    let matrix = std::fs::read_to_string(dir.path().join("out/matrix.csv")).unwrap();
    assert_eq!(
        matrix,
        "\"requirement\",\"vague_count\",\"not_vague_count\"\n\
         \"R1\",3,0\n\"R2\",0,3\n\"R3\",2,1\n\"R4\",1,2\n"
    );
}

#[test]
fn test_kappa_rejects_inconsistent_rater_count() {
    let dir = tempfile::tempdir().unwrap();

    // R1 has two votes, R2 one
    std::fs::write(
        dir.path().join("uneven.csv"),
        format!("Input.requirement,Answer.vague-requirement.label\nR1,{VAGUE}\nR1,{VAGUE}\nR2,{VAGUE}\n"),
    )
    .unwrap();
    let output = run(dir.path(), &["kappa", "uneven.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("inconsistent"), "{stderr}");
}

#[test]
fn test_kappa_rejects_unquoted_answer() {
    let dir = tempfile::tempdir().unwrap();

    std::fs::write(
        dir.path().join("unquoted.csv"),
        "Input.requirement,Answer.vague-requirement.label\nR1,1 - Yes, it is vague\nR1,1 - Yes, it is vague\n",
    )
    .unwrap();
    let output = run(dir.path(), &["kappa", "unquoted.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("has 3 fields, expected 2"), "{stderr}");
}

#[test]
fn test_majority_output_file() {
    let dir = tempfile::tempdir().unwrap();
    write_batches(dir.path());

    let output = run(dir.path(), &["majority", "batch-*.csv", "-o", "majority_label.csv"]);
    assert!(output.status.success(), "{:?}", output);

    let content = std::fs::read_to_string(dir.path().join("majority_label.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "\"requirement\",\"vague_count\",\"not_vague_count\",\"majority_label\""
    );
    assert_eq!(lines[1], "\"R1\",3,0,1");
    assert_eq!(lines[2], "\"R2\",0,3,0");
    assert_eq!(lines[4], "\"R4\",1,2,0");
}

#[test]
fn test_ties_listing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("batch.csv"),
        format!(
            "Input.requirement,Answer.vague-requirement.label\nR1,{VAGUE}\nR1,{NOT_VAGUE}\nR2,{VAGUE}\nR2,{VAGUE}\n"
        ),
    )
    .unwrap();

    let output = run(dir.path(), &["ties", "batch.csv"]);
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        stdout(&output),
        "\"Input.requirement\",\"Answer.vague-requirement.label\"\n\"R1\",\"\"\n"
    );
}

#[test]
fn test_config_file_changes_columns() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("vaguereq.toml"),
        "[input]\ndelimiter = \";\"\nitem_column = \"req\"\nanswer_column = \"vote\"\n\n[votes]\nvague = [\"y\"]\nnot_vague = [\"n\"]\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("b.csv"), "req;vote\nA;y\nA;y\nB;n\nB;y\n").unwrap();

    let output = run(dir.path(), &["majority", "b.csv"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("\"A\",2,0,1"));
    // Tie resolves to vague by default
    assert!(stdout(&output).contains("\"B\",1,1,1"));
}

#[test]
fn test_compare_groups() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("crowd.csv"),
        format!(
            "Input.requirement,Answer.vague-requirement.label\nR1,{VAGUE}\nR2,{NOT_VAGUE}\nR3,{VAGUE}\n"
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("expert.csv"),
        format!(
            "Input.requirement,Answer.vague-requirement.label\nR1,{VAGUE}\nR2,{VAGUE}\nR3,{VAGUE}\n"
        ),
    )
    .unwrap();

    let output = run(
        dir.path(),
        &["compare", "--first", "crowd.csv", "--second", "expert.csv", "-f", "json"],
    );
    assert!(output.status.success(), "{:?}", output);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["items"], 3);
    assert_eq!(report["unanimous"], 2);
    assert_eq!(report["disagreeing"], 1);
}

#[test]
fn test_compare_tie_policy() {
    let dir = tempfile::tempdir().unwrap();
    // R1 is tied in the first group
    std::fs::write(
        dir.path().join("crowd.csv"),
        format!(
            "Input.requirement,Answer.vague-requirement.label\nR1,{VAGUE}\nR1,{NOT_VAGUE}\nR2,{NOT_VAGUE}\nR2,{NOT_VAGUE}\n"
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("expert.csv"),
        format!(
            "Input.requirement,Answer.vague-requirement.label\nR1,{VAGUE}\nR1,{VAGUE}\nR2,{NOT_VAGUE}\nR2,{NOT_VAGUE}\n"
        ),
    )
    .unwrap();

    let args = ["compare", "--first", "crowd.csv", "--second", "expert.csv", "-f", "json"];
    let output = run(dir.path(), &args);
    assert!(output.status.success(), "{:?}", output);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["disagreeing"], 0);

    let mut with_flag = args.to_vec();
    with_flag.push("--prefer-not-vague");
    let output = run(dir.path(), &with_flag);
    assert!(output.status.success(), "{:?}", output);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["disagreeing"], 1);
    assert_eq!(report["unanimous"], 1);
}

#[test]
fn test_evaluate_markdown() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("labels.csv"),
        "requirement,majority_label\nA,1\nB,0\nC,-1\nD,0\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("truth.csv"), "requirement,vague\nA,1\nB,0\nC,0\nD,1\n").unwrap();

    let output = run(
        dir.path(),
        &["evaluate", "labels.csv", "truth.csv", "--format", "markdown"],
    );
    assert!(output.status.success(), "{:?}", output);
    let md = stdout(&output);
    assert!(md.contains("|True positives|1|"));
    assert!(md.contains("|False positives|1|"));
    assert!(md.contains("|False negatives|1|"));
    assert!(md.contains("|Accuracy|0.5|"));
}

#[test]
fn test_evaluate_missing_truth_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("labels.csv"), "requirement,majority_label\nZ,1\n").unwrap();
    std::fs::write(dir.path().join("truth.csv"), "requirement,vague\nA,1\n").unwrap();

    let output = run(dir.path(), &["evaluate", "labels.csv", "truth.csv"]);
    assert!(!output.status.success());
}

#[test]
fn test_rank_mean_average_precision() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("scores.csv"),
        "vague_prob,not_vague_prob,majority_label\n0.75,0.25,0\n0.7,0.3,1\n0.6,0.4,1\n0.8,0.2,0\n0.9,0.1,1\n",
    )
    .unwrap();

    let output = run(dir.path(), &["rank", "scores.csv", "--format", "json"]);
    assert!(output.status.success(), "{:?}", output);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let vague = report["average_precision_vague"].as_f64().unwrap();
    assert!((vague - 0.7).abs() < 1e-9);
    assert_eq!(report["average_precision_not_vague"], 0.0);
    assert!((report["mean_average_precision"].as_f64().unwrap() - 0.35).abs() < 1e-9);

    let tied = dir.path().join("tied.csv");
    std::fs::write(&tied, "vague_prob,not_vague_prob,majority_label\n0.5,0.5,1\n").unwrap();
    let output = run(dir.path(), &["rank", "tied.csv"]);
    assert!(!output.status.success());
}

#[test]
fn test_predict_appends_column() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("probs.csv"),
        "not_vague_prob,vague_prob\n0.1,0.9\n0.4,0.5\n0.7,0.3\n",
    )
    .unwrap();

    let output = run(dir.path(), &["predict", "probs.csv", "--threshold", "0.6"]);
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        stdout(&output),
        "\"not_vague_prob\",\"vague_prob\",\"prediction\"\n0.1,0.9,1\n0.4,0.5,0\n0.7,0.3,0\n"
    );
}

#[test]
fn test_words_counts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("train.csv"),
        "requirement,majority_label\n\"be fast, always\",1\nbe secure,0\n",
    )
    .unwrap();

    let output = run(dir.path(), &["words", "train.csv"]);
    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    let mut lines = out.lines();
    assert_eq!(
        lines.next(),
        Some("\"word\",\"overall_count\",\"vague_count\",\"not_vague_count\",\"difference\"")
    );
    assert_eq!(lines.next(), Some("\"be\",2,1,1,0"));
    assert!(out.contains("\",\",1,1,0,1"));
}

#[test]
fn test_grid_search_best_entries() {
    let dir = tempfile::tempdir().unwrap();
    for (name, recall) in [("a", 0.4), ("b", 0.9), ("c", 0.6)] {
        let run_dir = dir.path().join("runs").join(name);
        std::fs::create_dir_all(&run_dir).unwrap();
        let doc = serde_json::json!({
            "hyperparameter": { "C": 1.0, "ngram_range": [1, 1] },
            "data_set": { "resampling_strategy": "none" },
            "fold_results": [ { "metrics": { "test": { "vague": { "recall": recall } } } } ]
        });
        std::fs::write(run_dir.join("run-evaluation.json"), doc.to_string()).unwrap();
    }

    let output = run(
        dir.path(),
        &["grid-search", "runs/**/*evaluation.json", "--best", "2"],
    );
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        stdout(&output),
        "\"recall\";\"C\";\"resampling_strategy\";\"kfold_splits\"\n0.6;1.0;\"none\";1\n0.9;1.0;\"none\";1\n"
    );
}

#[test]
fn test_slice_and_reformat() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("corpus.csv"),
        "sentence;label\nA shall run.;requirement\nIntro;heading\nA shall run.;requirement\nB shall stop.;requirement\nC shall log.;requirement\n",
    )
    .unwrap();

    let output = run(
        dir.path(),
        &["slice", "corpus.csv", "--batch-size", "2", "--out-dir", "batches"],
    );
    assert!(output.status.success(), "{:?}", output);
    let first = std::fs::read_to_string(dir.path().join("batches/corpus-batch-0.csv")).unwrap();
    assert_eq!(first, "\"requirement\"\n\"A shall run.\"\n\"B shall stop.\"\n");
    assert!(dir.path().join("batches/corpus-batch-1.csv").exists());
    assert!(!dir.path().join("batches/corpus-batch-2.csv").exists());

    std::fs::write(dir.path().join("batches/extra.csv"), "requirement;vague\nX;1\n").unwrap();
    let output = run(
        dir.path(),
        &["reformat", "batches/extra.csv", "--from", ";", "--to", ","],
    );
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("batches/extra.csv")).unwrap(),
        "\"requirement\",\"vague\"\n\"X\",1\n"
    );
}

#[test]
fn test_init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(dir.path(), &["init"]);
    assert!(output.status.success(), "{:?}", output);
    let config = dir.path().join("vaguereq.toml");
    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("[votes]"));

    std::fs::write(&config, "# custom\n").unwrap();
    let output = run(dir.path(), &["init"]);
    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(&config).unwrap(), "# custom\n");

    let output = run(dir.path(), &["init", "--force"]);
    assert!(output.status.success());
    assert!(std::fs::read_to_string(&config).unwrap().contains("[majority]"));
}

#[test]
fn test_unmatched_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["kappa", "nothing-*.csv"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No files match"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    write_batches(dir.path());
    let output = run(
        dir.path(),
        &["--config", "missing.toml", "kappa", "batch-1.csv"],
    );
    assert!(!output.status.success());
}
