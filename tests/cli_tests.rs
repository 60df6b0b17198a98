//! Command-line behaviour of the `clipper` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ALLOWED: &str = "creator@example.com";

fn clipper(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clipper").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("CLIPPER_IDENTITY")
        .env_remove("RUST_LOG")
        .env("CLIPPER_ALLOWED_IDENTITY", ALLOWED);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    clipper(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_duration_out_of_range_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    clipper(&dir)
        .args(["run", "--input", "talk.mp4", "--duration", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--duration"));
}

#[test]
fn test_missing_identity_is_denied() {
    let dir = tempfile::tempdir().unwrap();
    clipper(&dir)
        .args(["run", "--input", "talk.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));
}

#[test]
fn test_wrong_identity_is_denied_before_inputs_are_checked() {
    let dir = tempfile::tempdir().unwrap();
    clipper(&dir)
        .args(["run", "--input", "does-not-exist.mp4", "--identity", "someone@else.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"))
        .stderr(predicate::str::contains("File not found").not());
}

#[test]
fn test_allowed_identity_reaches_input_validation() {
    let dir = tempfile::tempdir().unwrap();
    clipper(&dir)
        .args(["run", "--input", "does-not-exist.mp4"])
        .env("CLIPPER_IDENTITY", "  Creator@Example.com ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_wrong_logo_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("talk.mp4"), b"x").unwrap();
    clipper(&dir)
        .args([
            "run",
            "--input",
            "talk.mp4",
            "--logo",
            "logo.gif",
            "--identity",
            ALLOWED,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_broken_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clipper.toml"), "[encoding\ncrf = ").unwrap();
    clipper(&dir)
        .args(["inspect", "--input", "talk.mp4", "--identity", ALLOWED])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_empty_allow_list_denies_everyone() {
    let dir = tempfile::tempdir().unwrap();
    clipper(&dir)
        .env_remove("CLIPPER_ALLOWED_IDENTITY")
        .args(["plan", "--input", "talk.mp4", "--identity", ALLOWED])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));
}
