//! Integration tests for the regwiz CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const VALID_RECORD: &str = r#"name: Ada Lovelace
email: ada@example.com
age: 36
country: United Kingdom
password: abc123
confirmPassword: abc123
"#;

/// Helper to get a regwiz command running in `dir`
fn regwiz(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("regwiz").unwrap();
    cmd.current_dir(dir.path()).env_remove("REGWIZ_LOG");
    cmd
}

/// Helper to write a record file into the temp directory
fn write_record(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("registration wizard"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("regwiz"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Steps / Schema Tests
// ============================================================================

#[test]
fn test_steps_lists_every_step() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal Information"))
        .stdout(predicate::str::contains("Location"))
        .stdout(predicate::str::contains("Security"))
        .stdout(predicate::str::contains("(completion)"));
}

#[test]
fn test_steps_json_format() {
    let tmp = TempDir::new().unwrap();
    let output = regwiz(&tmp)
        .args(["steps", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[2]["fields"][1]["key"], "confirmPassword");
    assert!(steps[3]["fields"].as_array().unwrap().is_empty());
}

#[test]
fn test_schema_summary() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("confirmPassword"))
        .stdout(predicate::str::contains("Passwords must match"));
}

#[test]
fn test_schema_raw() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .args(["schema", "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"$schema\""))
        .stdout(predicate::str::contains("\"minimum\": 18"));
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_valid_record() {
    let tmp = TempDir::new().unwrap();
    write_record(&tmp, "ada.yaml", VALID_RECORD);

    regwiz(&tmp)
        .args(["validate", "ada.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All files passed validation"));
}

#[test]
fn test_validate_reports_mismatched_passwords() {
    let tmp = TempDir::new().unwrap();
    let record = VALID_RECORD.replace("confirmPassword: abc123", "confirmPassword: abc124");
    write_record(&tmp, "mismatch.yaml", &record);

    regwiz(&tmp)
        .args(["validate", "mismatch.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 error(s)"))
        .stdout(predicate::str::contains("Passwords must match"));
}

#[test]
fn test_validate_step_scope_ignores_later_fields() {
    let tmp = TempDir::new().unwrap();
    write_record(
        &tmp,
        "partial.yaml",
        "name: Ada Lovelace\nemail: ada@example.com\nage: 36\n",
    );

    regwiz(&tmp)
        .args(["validate", "--step", "1", "partial.yaml"])
        .assert()
        .success();

    regwiz(&tmp)
        .args(["validate", "partial.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Country is required"));
}

#[test]
fn test_validate_rejects_step_without_fields() {
    let tmp = TempDir::new().unwrap();
    write_record(&tmp, "ada.yaml", VALID_RECORD);

    regwiz(&tmp)
        .args(["validate", "--step", "4", "ada.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no fields"));
}

#[test]
fn test_validate_directory_keep_going() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("records")).unwrap();
    write_record(&tmp, "records/a.yaml", "name: A\n");
    write_record(&tmp, "records/b.json", "{ \"age\": 17 }");
    write_record(&tmp, "records/c.yaml", VALID_RECORD);

    regwiz(&tmp)
        .args(["validate", "--keep-going", "--summary", "records"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Files checked:  3"))
        .stdout(predicate::str::contains("Files passed:   1"))
        .stderr(predicate::str::contains("2 files have errors"));
}

// ============================================================================
// Submit Command Tests
// ============================================================================

#[test]
fn test_submit_valid_record_completes() {
    let tmp = TempDir::new().unwrap();
    write_record(&tmp, "ada.yaml", VALID_RECORD);

    regwiz(&tmp)
        .args(["submit", "ada.yaml", "--delay-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Please wait"))
        .stdout(predicate::str::contains("Registration Complete!"))
        .stdout(predicate::str::contains("REG-"));
}

#[test]
fn test_submit_stops_at_first_invalid_step() {
    let tmp = TempDir::new().unwrap();
    let record = VALID_RECORD.replace("age: 36", "age: 17").replace("name: Ada Lovelace", "name: A");
    write_record(&tmp, "young.yaml", &record);

    regwiz(&tmp)
        .args(["submit", "young.yaml", "--delay-ms", "0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Registration Complete!").not())
        .stderr(predicate::str::contains("Step 1 (Personal Information)"))
        .stderr(predicate::str::contains("Name must be at least 2 characters"))
        .stderr(predicate::str::contains("You must be at least 18 years old"));
}

#[test]
fn test_submit_blocks_on_password_step() {
    let tmp = TempDir::new().unwrap();
    let record = VALID_RECORD.replace("confirmPassword: abc123", "confirmPassword: abc124");
    write_record(&tmp, "mismatch.yaml", &record);

    regwiz(&tmp)
        .args(["submit", "mismatch.yaml", "--delay-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step 3 (Security)"))
        .stderr(predicate::str::contains("Passwords must match"));
}

#[test]
fn test_submit_json_snapshot_masks_passwords() {
    let tmp = TempDir::new().unwrap();
    write_record(&tmp, "ada.yaml", VALID_RECORD);

    let output = regwiz(&tmp)
        .args(["submit", "ada.yaml", "--delay-ms", "0", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["currentStepIndex"], 3);
    assert_eq!(snapshot["previousStepIndex"], 2);
    assert_eq!(snapshot["isSubmitting"], false);
    assert_eq!(snapshot["values"]["password"], "******");
    assert_eq!(snapshot["values"]["name"], "Ada Lovelace");
    assert!(snapshot["receipt"]["id"].as_str().unwrap().starts_with("REG-"));
    assert!(snapshot["receipt"]["submittedAt"].is_string());
}

#[test]
fn test_submit_reports_non_numeric_age_on_its_step() {
    let tmp = TempDir::new().unwrap();
    let record = VALID_RECORD.replace("age: 36", "age: seventeen");
    write_record(&tmp, "wordy.yaml", &record);

    regwiz(&tmp)
        .args(["submit", "wordy.yaml", "--delay-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step 1 (Personal Information)"))
        .stderr(predicate::str::contains("Age must be a number"))
        .stderr(predicate::str::contains("Failed to parse").not());
}

#[test]
fn test_submit_rejects_non_mapping_record() {
    let tmp = TempDir::new().unwrap();
    write_record(&tmp, "list.yaml", "- Ada\n- Lovelace\n");

    regwiz(&tmp)
        .args(["submit", "list.yaml", "--delay-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mapping"));
}

#[test]
fn test_submit_delay_from_environment() {
    let tmp = TempDir::new().unwrap();
    write_record(&tmp, "ada.json", &serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "age": 36,
        "country": "United Kingdom",
        "password": "abc123",
        "confirmPassword": "abc123"
    }).to_string());

    regwiz(&tmp)
        .env("REGWIZ_SUBMIT_DELAY_MS", "0")
        .args(["--quiet", "submit", "ada.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("REG-"));
}

#[test]
fn test_submit_delay_from_local_config() {
    let tmp = TempDir::new().unwrap();
    write_record(&tmp, ".regwiz.yaml", "submit_delay_ms: 0\n");
    write_record(&tmp, "ada.yaml", VALID_RECORD);

    regwiz(&tmp)
        .env_remove("REGWIZ_SUBMIT_DELAY_MS")
        .args(["submit", "ada.yaml"])
        .timeout(std::time::Duration::from_millis(1500))
        .assert()
        .success();
}

#[test]
fn test_submit_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .args(["submit", "nope.yaml", "--delay-ms", "0"])
        .assert()
        .failure();
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    regwiz(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("regwiz"));
}
