//! Command-line surface tests. None of these reach the network.

use assert_cmd::Command;
use predicates::prelude::*;

fn boost_report() -> Command {
    Command::cargo_bin("boost-report").unwrap()
}

#[test]
fn help_lists_options() {
    boost_report()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--date"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--forget-token"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn invalid_date_is_rejected() {
    boost_report()
        .args(["--date", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn missing_token_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    boost_report()
        .current_dir(dir.path())
        .env("BOOST_REPORT_TOKEN_FILE", dir.path().join("token"))
        .write_stdin("\n")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Please enter your Alby token"))
        .stderr(predicate::str::contains("A token is mandatory"));
}

#[test]
fn missing_token_in_json_mode_prints_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = boost_report()
        .current_dir(dir.path())
        .arg("--json")
        .env("BOOST_REPORT_TOKEN_FILE", dir.path().join("token"))
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please enter your Alby token"))
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(parsed["error"]
        .as_str()
        .unwrap()
        .contains("A token is mandatory"));
}

#[test]
fn bad_configuration_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    boost_report()
        .current_dir(dir.path())
        .env("BOOST_REPORT_PAGE_SIZE", "0")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Page size"));
}
