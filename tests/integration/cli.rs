use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gdscan() -> Command {
    let mut cmd = Command::cargo_bin("gdscan").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    gdscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("decode"));
}

#[test]
fn test_scan_help_shows_original_flags() {
    gdscan()
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--client-secrets-path"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--config-dir"))
        .stdout(predicate::str::contains("--overwrite"));
}

#[test]
fn test_decode_prints_one_path_per_line() {
    gdscan()
        .args(["decode", "My Drive/Q1\\54 final,Team\\57Shared/Q1\\54 final"])
        .assert()
        .success()
        .stdout("My Drive/Q1, final\nTeam/Shared/Q1, final\n");
}

#[test]
fn test_decode_rejects_malformed_input() {
    gdscan()
        .args(["decode", "broken\\5"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot decode"));
}

#[test]
fn test_scan_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("shared.csv");
    std::fs::write(&output, "previous report").unwrap();

    gdscan()
        .arg("scan")
        .arg(&output)
        .arg("--config-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--overwrite"));

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous report");
}

#[test]
fn test_scan_without_client_secrets_fails_before_network() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("shared.csv");

    gdscan()
        .arg("--no-progress")
        .arg("scan")
        .arg(&output)
        .arg("--config-dir")
        .arg(temp.path())
        .arg("--client-secrets-path")
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"))
        .stderr(predicate::str::contains("missing.json"));

    assert!(!output.exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "page_size = 0\n").unwrap();

    gdscan()
        .arg("scan")
        .arg(temp.path().join("shared.csv"))
        .arg("-c")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("page_size must be greater than 0"));
}
