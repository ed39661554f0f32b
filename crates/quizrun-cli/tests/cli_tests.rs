//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BANK_DIR: &str = "../../banks";

fn quizrun(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizrun").unwrap();
    cmd.env("HOME", home)
        .env_remove("QUIZRUN_BANK_DIR")
        .env_remove("QUIZRUN_MODE");
    cmd
}

fn play(home: &Path) -> Command {
    let mut cmd = quizrun(home);
    cmd.args(["play", "--bank-dir", BANK_DIR, "--bank", "giai-phau", "--no-shuffle"]);
    cmd
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == ext))
        .collect()
}

#[test]
fn play_instant_perfect_score() {
    let home = TempDir::new().unwrap();
    play(home.path())
        .args(["--format", "none"])
        .write_stdin("c\nn\nb\nn\nc\nn\nc\nn\na\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/5"))
        .stdout(predicate::str::contains("Tim người có mấy ngăn?"))
        .stdout(predicate::str::contains("Câu 1.").not())
        .stdout(predicate::str::contains("5/5"))
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("Excellent!"));
}

#[test]
fn play_exam_mode_scores_at_the_end() {
    let home = TempDir::new().unwrap();
    play(home.path())
        .args(["--mode", "exam", "--format", "none"])
        .write_stdin("a\na\na\na\na\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!").not())
        .stdout(predicate::str::contains("1/5"))
        .stdout(predicate::str::contains("20%"))
        .stdout(predicate::str::contains("Needs review"));
}

#[test]
fn play_abandoned_session_still_reports() {
    let home = TempDir::new().unwrap();
    play(home.path())
        .args(["--format", "none"])
        .write_stdin("c\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Session ended early: 1 of 5"));
}

#[test]
fn play_no_clean_shows_raw_text() {
    let home = TempDir::new().unwrap();
    play(home.path())
        .args(["--no-clean", "--format", "none"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Câu 1. Tim người có mấy ngăn?"));
}

#[test]
fn play_limit_with_seed() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["play", "--bank-dir", BANK_DIR, "--bank", "sinh-ly"])
        .args(["--mode", "exam", "--limit", "2", "--seed", "42", "--format", "none"])
        .write_stdin("a\na\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2/2"))
        .stdout(predicate::str::contains("Question 3/").not());
}

#[test]
fn play_from_csv_file() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["play", "--file", "../../banks/sinh-ly.csv", "--no-shuffle"])
        .args(["--mode", "exam", "--format", "none"])
        .write_stdin("b\na\nc\nb\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("4/4"));
}

#[test]
fn play_unknown_bank_lists_available() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["play", "--bank-dir", BANK_DIR, "--bank", "hoa-sinh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bank 'hoa-sinh' not found"))
        .stderr(predicate::str::contains("giai-phau"));
}

#[test]
fn play_without_bank_choice_fails_for_several_banks() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["play", "--bank-dir", BANK_DIR])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("choose one with --bank"));
}

#[test]
fn play_writes_reports_and_report_rerenders() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    play(home.path())
        .args(["--mode", "exam", "--format", "all", "--output"])
        .arg(out.path())
        .write_stdin("c\nb\nc\nc\nb\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Results saved to"));

    assert_eq!(files_with_extension(out.path(), "html").len(), 1);
    assert_eq!(files_with_extension(out.path(), "md").len(), 1);
    let json = files_with_extension(out.path(), "json");
    assert_eq!(json.len(), 1);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json[0]).unwrap()).unwrap();
    assert_eq!(saved["score"], 4);
    assert_eq!(saved["total"], 5);
    assert_eq!(saved["bank"]["id"], "giai-phau");

    quizrun(home.path())
        .arg("report")
        .arg(&json[0])
        .assert()
        .success()
        .stdout(predicate::str::contains("4/5"))
        .stdout(predicate::str::contains("80%"))
        .stdout(predicate::str::contains("✗ 5."));

    quizrun(home.path())
        .arg("report")
        .arg(&json[0])
        .args(["--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Quiz Report"));
}

#[test]
fn report_unknown_format_fails() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    play(home.path())
        .args(["--format", "json", "--output"])
        .arg(out.path())
        .write_stdin("q\n")
        .assert()
        .success();
    let json = files_with_extension(out.path(), "json");

    quizrun(home.path())
        .arg("report")
        .arg(&json[0])
        .args(["--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn banks_lists_manifest() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["banks", "--bank-dir", BANK_DIR])
        .assert()
        .success()
        .stdout(predicate::str::contains("giai-phau"))
        .stdout(predicate::str::contains("Sinh lý học"))
        .stdout(predicate::str::contains("2 bank(s)"));
}

#[test]
fn validate_bank_directory() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["validate", BANK_DIR])
        .assert()
        .success()
        .stdout(predicate::str::contains("Giải phẫu cơ bản (5 questions)"))
        .stdout(predicate::str::contains("Sinh lý học (4 questions)"))
        .stdout(predicate::str::contains("resolved to 'c'"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_single_file() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["validate", "../../banks/sinh-ly.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sinh-ly (4 questions)"))
        .stdout(predicate::str::contains("All banks valid"));
}

#[test]
fn validate_reports_unresolvable_answer() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(
        &path,
        "câu hỏi,đáp án a,đáp án b,đáp án c,đáp án d,đáp án đúng\n\
         Câu 1. Q1?,1,2,3,4,A\n\
         Câu 2. Q2?,1,2,3,4,E\n",
    )
    .unwrap();

    quizrun(home.path())
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[line 3] ERROR"))
        .stderr(predicate::str::contains("1 error(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .args(["validate", "nonexistent.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    quizrun(home.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizrun.toml"))
        .stdout(predicate::str::contains("Created banks/sample.csv"));

    assert!(dir.path().join("quizrun.toml").exists());
    assert!(dir.path().join("banks/manifest.json").exists());

    // The scaffold is playable with the generated config.
    quizrun(home.path())
        .current_dir(dir.path())
        .args(["play", "--no-shuffle", "--mode", "exam", "--format", "none"])
        .write_stdin("c\nc\na\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("3/3"));
}

#[test]
fn init_skips_existing() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    quizrun(home.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizrun(home.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Multiple-choice quiz runner"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    quizrun(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizrun"));
}
