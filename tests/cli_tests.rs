//! Integration tests for the tfadopt CLI
//!
//! These tests run the compiled binary against a saved describe-alarms
//! response and inspect what it prints and writes.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Get the path to the tfadopt binary
fn tfadopt_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tfadopt"))
}

/// Path of the describe-alarms fixture
fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("describe_alarms.json")
}

/// Run tfadopt in `dir` and return output
fn run_tfadopt_in(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(tfadopt_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("TFADOPT_INPUT")
        .env_remove("TFADOPT_SEED")
        .output()
        .expect("Failed to execute tfadopt")
}

/// Run tfadopt in a fresh temporary directory
fn run_tfadopt(args: &[&str]) -> std::process::Output {
    let dir = tempfile::tempdir().unwrap();
    run_tfadopt_in(dir.path(), args)
}

fn state_resources(stdout: &[u8]) -> serde_json::Map<String, serde_json::Value> {
    let value: serde_json::Value = serde_json::from_slice(stdout).expect("state is JSON");
    value["modules"][0]["resources"]
        .as_object()
        .expect("resources object")
        .clone()
}

#[test]
fn test_tfadopt_version() {
    let output = run_tfadopt(&["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tfadopt"));
}

#[test]
fn test_tfadopt_help() {
    let output = run_tfadopt(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("tfstate"));
    assert!(stdout.contains("export"));
}

#[test]
fn test_tfstate_covers_every_alarm() {
    let input = fixture();
    let output = run_tfadopt(&["tfstate", "--input", input.to_str().unwrap()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let resources = state_resources(&output.stdout);
    assert_eq!(resources.len(), 3);

    let cpu = resources
        .iter()
        .find(|(_, r)| r["primary"]["id"] == "cpu alarm!!")
        .map(|(_, r)| r)
        .unwrap();
    let attributes = &cpu["primary"]["attributes"];
    assert_eq!(cpu["type"], "aws_cloudwatch_metric_alarm");
    assert_eq!(attributes["insufficient_data_actions.#"], "0");
    assert_eq!(attributes["dimensions.InstanceId"], "i-123");
    assert_eq!(attributes["unit"], "");
    assert_eq!(attributes["threshold"], "80.0");

    let duplicates = resources
        .values()
        .filter(|r| r["primary"]["id"] == "Alarm#1")
        .count();
    assert_eq!(duplicates, 2);
}

#[test]
fn test_seed_makes_output_reproducible() {
    let input = fixture();
    let args = ["tfstate", "--input", input.to_str().unwrap(), "--seed", "17"];

    let first = run_tfadopt(&args);
    let second = run_tfadopt(&args);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_tf_reads_stdin() {
    let content = std::fs::read_to_string(fixture()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut child = Command::new(tfadopt_binary())
        .args(["tf", "--input", "-"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute tfadopt");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("resource \"aws_cloudwatch_metric_alarm\"").count(), 3);
    assert!(stdout.contains("\"cpu_alarm_"));
    assert!(stdout.contains("\"QueueName\" = \"jobs\""));
}

#[test]
fn test_export_writes_consistent_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixture();
    let output = run_tfadopt_in(
        dir.path(),
        &["export", "--input", input.to_str().unwrap(), "--output-dir", "adopted"],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let tf = std::fs::read_to_string(dir.path().join("adopted/cloud_watch_alarm.tf")).unwrap();
    let state = std::fs::read(dir.path().join("adopted/terraform.tfstate")).unwrap();

    let resources = state_resources(&state);
    assert_eq!(resources.len(), 3);
    for key in resources.keys() {
        let identifier = key.trim_start_matches("aws_cloudwatch_metric_alarm.");
        assert!(tf.contains(&format!("\"{}\" {{", identifier)), "missing {}", key);
    }
}

#[test]
fn test_export_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixture();
    let args = ["export", "--input", input.to_str().unwrap()];

    assert!(run_tfadopt_in(dir.path(), &args).status.success());

    let second = run_tfadopt_in(dir.path(), &args);
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("--force"));

    let mut forced = args.to_vec();
    forced.push("--force");
    assert!(run_tfadopt_in(dir.path(), &forced).status.success());
}

#[test]
fn test_config_file_supplies_input_and_seed() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixture();
    std::fs::write(
        dir.path().join(".tfadopt.yaml"),
        format!("input: {}\nseed: 5\n", input.display()),
    )
    .unwrap();

    let first = run_tfadopt_in(dir.path(), &["tfstate"]);
    let second = run_tfadopt_in(dir.path(), &["tfstate"]);

    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(state_resources(&first.stdout).len(), 3);
}

#[test]
fn test_malformed_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bad.json"),
        r#"{"MetricAlarms": [{"AlarmName": "half"}]}"#,
    )
    .unwrap();

    let output = run_tfadopt_in(dir.path(), &["tfstate", "--input", "bad.json"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("MetricAlarms[0]"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_input_fails() {
    let output = run_tfadopt(&["tf"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input given"));
}
