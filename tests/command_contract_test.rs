use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn get_binary() -> String {
    env!("CARGO_BIN_EXE_cukereport").to_string()
}

const EVENTS: &str = r#"{"type":"feature-parsed","location":{"uri":"features/a.feature","line":1},"keyword":"Feature","name":"Contract"}
{"type":"scenario-parsed","location":{"uri":"features/a.feature","line":3},"keyword":"Scenario","name":"runs"}
{"type":"step-parsed","location":{"uri":"features/a.feature","line":4},"keyword":"Then ","text":"it fails"}
{"type":"case-prepared","identity":{"uri":"features/a.feature","line":3},"steps":[{"sourceLocation":{"uri":"features/a.feature","line":4}}]}
{"type":"step-finished","identity":{"uri":"features/a.feature","line":3},"index":0,"result":{"duration":2,"status":"failed","error":"boom"}}
{"type":"case-finished","identity":{"uri":"features/a.feature","line":3},"result":{"duration":2,"status":"failed"}}
{"type":"run-finished"}
"#;

fn write_events(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("events.ndjson");
    std::fs::write(&path, EVENTS).expect("Failed to write events");
    path
}

#[test]
fn test_report_compact_stdout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let events = write_events(&temp_dir);

    let output = Command::new(get_binary())
        .args(["report", events.to_str().unwrap_or_default(), "--compact"])
        .output()
        .expect("Failed to execute report command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(json[0]["name"], "Contract");
    assert_eq!(json[0]["elements"][0]["steps"][0]["result"]["error_message"], "boom");
}

#[test]
fn test_report_from_stdin_to_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report = temp_dir.path().join("reports/cucumber.json");

    let mut child = Command::new(get_binary())
        .args(["-o", report.to_str().unwrap_or_default()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn report command");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(EVENTS.as_bytes())
        .expect("Failed to write events");
    let output = child.wait_with_output().expect("Failed to wait for report");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = std::fs::read_to_string(&report).expect("Report file missing");
    assert!(written.starts_with("[\n  {"));
}

#[test]
fn test_summary_json_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let events = write_events(&temp_dir);

    let output = Command::new(get_binary())
        .args(["summary", events.to_str().unwrap_or_default(), "--format", "json"])
        .output()
        .expect("Failed to execute summary command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Invalid JSON output");
    assert_eq!(json["cases_finished"], 1);
    assert_eq!(json["step_statuses"]["failed"], 1);
}

#[test]
fn test_strict_report_fails_on_bad_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let events = temp_dir.path().join("broken.ndjson");
    std::fs::write(&events, "{\"type\":\"run-finished\"\nnot json\n").expect("write");

    let output = Command::new(get_binary())
        .args(["report", events.to_str().unwrap_or_default(), "--strict"])
        .output()
        .expect("Failed to execute report command");

    assert!(!output.status.success());
}
