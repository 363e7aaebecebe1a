//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vocabquiz(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("vocabquiz").unwrap();
    cmd.current_dir(dir)
        .env_remove("VOCABQUIZ_DB")
        .env_remove("VOCABQUIZ_DATA_DIR");
    cmd
}

/// A temp dir after `vocabquiz init`.
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    vocabquiz(dir.path()).arg("init").assert().success();
    dir
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    vocabquiz(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adaptive vocabulary quiz generator"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    vocabquiz(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vocabquiz"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    vocabquiz(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created vocabquiz.toml"))
        .stdout(predicate::str::contains("Created data/sample.csv"));

    assert!(dir.path().join("vocabquiz.toml").exists());
    assert!(dir.path().join("data/sample.csv").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized();

    vocabquiz(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn sets_and_words() {
    let dir = initialized();

    vocabquiz(dir.path())
        .arg("sets")
        .assert()
        .success()
        .stdout(predicate::str::contains("sample.csv"));

    vocabquiz(dir.path())
        .args(["words", "--set", "sample.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apple"))
        .stdout(predicate::str::contains("8 words"));
}

#[test]
fn fresh_exam_is_all_new() {
    let dir = initialized();

    let sheet = stdout_json(vocabquiz(dir.path()).args([
        "exam",
        "--sets",
        "sample.csv",
        "--num-questions",
        "4",
        "--new-ratio",
        "100",
        "--seed",
        "1",
        "--format",
        "json",
        "--output",
        "exam.json",
    ]));

    let questions = sheet["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 4);
    for q in questions {
        assert_eq!(q["is_new"], true);
        assert_eq!(q["options"].as_array().unwrap().len(), 4);
    }
    assert_eq!(sheet["sets"][0], "sample.csv");
    assert!(dir.path().join("exam.json").exists());
}

#[test]
fn text_exam_lists_options() {
    let dir = initialized();

    vocabquiz(dir.path())
        .args(["exam", "--sets", "sample.csv", "--num-questions", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("A) "));
}

#[test]
fn submit_then_stats() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("results.json"),
        r#"[
            {"word": "apple", "is_correct": false},
            {"word": "apple", "is_correct": false},
            {"word": "apple", "is_correct": false}
        ]"#,
    )
    .unwrap();

    vocabquiz(dir.path())
        .args(["submit", "--results", "results.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 3 results"))
        .stdout(predicate::str::contains("Score: 0%"));

    let stats = stdout_json(vocabquiz(dir.path()).args([
        "stats", "--words", "apple", "--format", "json",
    ]));
    let apple = &stats[0];
    assert_eq!(apple["word"], "apple");
    assert_eq!(apple["correct_count"], 0);
    assert_eq!(apple["mistake_count"], 3);
    assert_eq!(apple["ratio"], 0.0);
    assert_eq!(apple["recent_mistake"], 3);

    vocabquiz(dir.path())
        .args(["stats", "--sort", "ratio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apple"))
        .stdout(predicate::str::contains("weak"));
}

#[test]
fn empty_results_rejected() {
    let dir = initialized();
    std::fs::write(dir.path().join("results.json"), "[]").unwrap();

    vocabquiz(dir.path())
        .args(["submit", "--results", "results.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("results are required"));
}

#[test]
fn reset_requires_confirmation() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("results.json"),
        r#"[{"word": "pear", "is_correct": true}]"#,
    )
    .unwrap();
    vocabquiz(dir.path())
        .args(["submit", "--results", "results.json"])
        .assert()
        .success();

    vocabquiz(dir.path())
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    vocabquiz(dir.path())
        .args(["reset", "--yes"])
        .assert()
        .success();

    vocabquiz(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No statistics recorded yet."));
}

#[test]
fn out_of_range_ratio_rejected() {
    let dir = initialized();

    vocabquiz(dir.path())
        .args(["exam", "--sets", "sample.csv", "--new-ratio", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("new_ratio"));
}

#[test]
fn unknown_set_fails() {
    let dir = initialized();

    vocabquiz(dir.path())
        .args(["exam", "--sets", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vocabulary set not found"));
}

#[test]
fn unknown_sort_key_fails() {
    let dir = initialized();

    vocabquiz(dir.path())
        .args(["stats", "--sort", "streak"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort key"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    vocabquiz(dir.path())
        .args(["--config", "missing.toml", "sets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn explicit_config_path() {
    let dir = TempDir::new().unwrap();
    let words = dir.path().join("words");
    std::fs::create_dir(&words).unwrap();
    std::fs::write(words.join("pets.csv"), "cat,貓\ndog,狗\n").unwrap();
    std::fs::write(
        dir.path().join("custom.toml"),
        format!(
            "data_dir = '{}'\n\n[store]\ntype = \"memory\"\n",
            words.display()
        ),
    )
    .unwrap();

    vocabquiz(dir.path())
        .args(["--config", "custom.toml", "words", "--set", "pets.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 words"));
}
