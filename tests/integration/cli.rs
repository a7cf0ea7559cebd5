//! Running the binary in batch mode

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::common::fixtures::{program_file, BROKEN, SQUARE, TWO_REDEXES};

fn retrace(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("retrace").expect("binary not built");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn batch_prints_history_oldest_first() {
    let data = TempDir::new().unwrap();
    let (_dir, program) = program_file(SQUARE);

    retrace(&data)
        .arg(&program)
        .args(["--batch", "1,1,1", "--oldest-first"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#0   (2 + 3) * (2 + 3)"))
        .stdout(predicate::str::contains("#3   25"))
        .stdout(predicate::str::contains("      5 * 5 ⇒ 25"))
        .stdout(predicate::str::ends_with("normal form\n"));
}

#[test]
fn batch_json_rows() {
    let data = TempDir::new().unwrap();
    let (_dir, program) = program_file(SQUARE);

    let output = retrace(&data)
        .arg(&program)
        .args(["--batch", "1", "--json", "--oldest-first"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["mode"], "anchored");
    assert_eq!(rows[1]["fragments"][1]["changed"]["old"], "2 + 3");
    assert_eq!(report["choices"][0]["from_text"], "(5)");
    assert_eq!(report["normal_form"], false);
}

#[test]
fn all_mode_lists_every_choice() {
    let data = TempDir::new().unwrap();
    let (_dir, program) = program_file(TWO_REDEXES);

    retrace(&data)
        .arg(&program)
        .args(["--mode", "all", "--batch", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("  1  1 + 1 ⇒ 2  rule 1"))
        .stdout(predicate::str::contains("  2  2 + 2 ⇒ 4  rule 2"));
}

#[test]
fn config_file_sets_mode() {
    let data = TempDir::new().unwrap();
    let (dir, program) = program_file(TWO_REDEXES);
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[engine]\nmode = \"all\"\n").unwrap();

    retrace(&data)
        .arg(&program)
        .arg("--config")
        .arg(&config)
        .args(["--batch", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("rule 2"));
}

#[test]
fn first_run_writes_example_config() {
    let data = TempDir::new().unwrap();
    let (_dir, program) = program_file(SQUARE);

    retrace(&data)
        .arg(&program)
        .args(["--batch", ""])
        .assert()
        .success();
    assert!(data.path().join("config.toml").exists());
    assert!(data.path().join("logs").join("retrace.log").exists());
}

#[test]
fn parse_error_fails_with_message() {
    let data = TempDir::new().unwrap();
    let (_dir, program) = program_file(BROKEN);

    retrace(&data)
        .arg(&program)
        .args(["--batch", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2:"));
}

#[test]
fn choice_beyond_list_fails() {
    let data = TempDir::new().unwrap();
    let (_dir, program) = program_file(SQUARE);

    retrace(&data)
        .arg(&program)
        .args(["--batch", "1,4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step 2"));
}

#[test]
fn missing_program_fails() {
    let data = TempDir::new().unwrap();

    retrace(&data)
        .arg(data.path().join("nope.rt"))
        .args(["--batch", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
