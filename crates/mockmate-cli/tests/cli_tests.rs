//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mockmate() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("mockmate").unwrap();
    // Keep tests hermetic even when the host has a real key configured.
    cmd.env_remove("MOCKMATE_GEMINI_KEY");
    cmd
}

#[test]
fn help_output() {
    mockmate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI mock-interview practice tool"));
}

#[test]
fn version_output() {
    mockmate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mockmate"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    mockmate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created mockmate.toml"));

    assert!(dir.path().join("mockmate.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    mockmate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mockmate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn create_rejects_unknown_difficulty() {
    let dir = TempDir::new().unwrap();
    mockmate()
        .current_dir(dir.path())
        .args(["create", "--role", "Backend Engineer", "--difficulty", "impossible"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn delete_unknown_interview_fails() {
    let dir = TempDir::new().unwrap();
    mockmate()
        .current_dir(dir.path())
        .args(["delete", "--interview", "no-such-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn missing_config_path_fails() {
    mockmate()
        .args(["list", "--config", "no-such-config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn user_flag_scopes_interviews() {
    let dir = TempDir::new().unwrap();

    mockmate()
        .current_dir(dir.path())
        .args(["create", "--role", "Data Engineer", "--user", "alice"])
        .assert()
        .success();

    mockmate()
        .current_dir(dir.path())
        .args(["list", "--user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data Engineer"));

    mockmate()
        .current_dir(dir.path())
        .args(["list", "--user", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No interviews yet"));
}

#[test]
fn full_session_with_scripted_answers() {
    let dir = TempDir::new().unwrap();

    // Local JSON store plus the mock generator; no network.
    let create = mockmate()
        .current_dir(dir.path())
        .args([
            "create",
            "--role",
            "Backend Engineer",
            "--description",
            "Rust, Tokio",
            "--experience",
            "4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created interview"));

    let stdout = String::from_utf8(create.get_output().stdout.clone()).unwrap();
    let interview_id = stdout
        .lines()
        .find_map(|l| l.strip_prefix("Created interview "))
        .unwrap()
        .trim()
        .to_string();

    let answers_path = dir.path().join("answers.txt");
    std::fs::write(
        &answers_path,
        "We compared REST API endpoints against a query language\n\
         closures capture scope\n\
         \n\
         \n\
         dependency injection helps testing\n",
    )
    .unwrap();

    mockmate()
        .current_dir(dir.path())
        .args(["practice", "--interview", &interview_id])
        .arg("--answers-file")
        .arg(&answers_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Attempt complete"));

    mockmate()
        .current_dir(dir.path())
        .args(["attempts", "--interview", &interview_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("/10"));

    mockmate()
        .current_dir(dir.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend Engineer"));

    mockmate()
        .current_dir(dir.path())
        .args(["delete", "--interview", &interview_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted interview"));
}
