use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn annals(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("annals").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn list_summarises_bundled_bank() {
    let home = tempdir().unwrap();
    annals(home.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("questions loaded (0 rejected)"))
        .stdout(predicate::str::contains("events, quotes, trivia"))
        .stdout(predicate::str::contains("quotes"))
        .stdout(predicate::str::contains("trivia"))
        .stdout(predicate::str::contains("timeline"));
}

#[test]
fn list_reads_external_bank() {
    let home = tempdir().unwrap();
    let bank = home.path().join("bank.json");
    fs::write(
        &bank,
        r#"{
            "name": "custom",
            "records": [
                {"id": "e1", "kind": "event", "category": "Greece", "difficulty": "easy",
                 "explanation": "x", "period": "Classical", "title": "Marathon", "year": -490},
                {"id": "e2", "kind": "event", "category": "Greece", "difficulty": "easy",
                 "explanation": "x", "period": "Classical", "title": "Salamis", "year": -480},
                {"id": "broken", "kind": "event", "category": "Greece"}
            ]
        }"#,
    )
    .unwrap();

    annals(home.path())
        .arg("--list")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions loaded (1 rejected)"))
        .stdout(predicate::str::contains("from     custom"))
        .stdout(predicate::str::contains("greece"));
}

#[test]
fn missing_bank_fails() {
    let home = tempdir().unwrap();
    annals(home.path())
        .args(["--list", "--bank", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/definitely/not/here.json"));
}

#[test]
fn help_lists_modes() {
    let home = tempdir().unwrap();
    annals(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--time-limit"))
        .stdout(predicate::str::contains("timeline"));
}

#[test]
fn zero_count_is_rejected() {
    let home = tempdir().unwrap();
    annals(home.path())
        .args(["--count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question count must be at least 1"));
}

#[test]
fn non_tty_stdin_is_rejected() {
    let home = tempdir().unwrap();
    annals(home.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stdin must be a tty"));
}

#[test]
fn history_starts_empty() {
    let home = tempdir().unwrap();
    annals(home.path())
        .arg("--history")
        .assert()
        .success()
        .stdout(predicate::str::contains("best trivia"))
        .stdout(predicate::str::contains("correct").not());
    assert!(home.path().join(".local/state/annals/history.db").exists());
}
