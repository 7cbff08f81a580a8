//! Integration tests for top-level CLI behavior.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{json, Value};

use taskboard::cassette::recorder::CassetteRecorder;

fn run_taskboard(args: &[&str], replay: Option<&Path>) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_taskboard");
    let mut command = Command::new(bin);
    command
        .args(args)
        .env_remove("TASKBOARD_RECORD")
        .env_remove("TASKBOARD_REPLAY")
        .env("TASKBOARD_BASE_URL", "http://127.0.0.1:9");
    if let Some(path) = replay {
        command.env("TASKBOARD_REPLAY", path);
    }
    command.output().expect("failed to run taskboard binary")
}

fn write_cassette(name: &str, outputs: Vec<Value>) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("taskboard_cli_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("session.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, name, "http://localhost:3000");
    for output in outputs {
        recorder.record("http", "send", Value::Null, output);
    }
    recorder.finish().unwrap()
}

fn ok(data: Value) -> Value {
    json!({"Ok": {"status": 200, "data": data}})
}

#[test]
fn help_lists_subcommands() {
    let output = run_taskboard(&["--help"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for name in ["list", "set-status", "assign", "create", "statuses", "skills", "developers"] {
        assert!(stdout.contains(name), "help is missing {name}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_taskboard(&["frobnicate"], None);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("frobnicate"));
}

#[test]
fn create_without_title_or_file_shows_error() {
    let output = run_taskboard(&["create"], None);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("--title") || stderr.contains("--from"));
}

#[test]
fn list_renders_replayed_tasks() {
    let cassette = write_cassette(
        "list",
        vec![
            ok(json!([{
                "taskId": "t-1",
                "title": "Write docs",
                "skills": [],
                "status": {"statusId": 1, "statusName": "Open"}
            }])),
            ok(json!([{"statusId": 1, "statusName": "Open"}])),
            ok(json!([])),
        ],
    );

    let output = run_taskboard(&["list"], Some(&cassette));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Task List"));
    assert!(stdout.contains("Write docs"));
    assert!(stdout.contains("Required skills: N/A"));
    assert!(stdout.contains("Status: Open"));

    let _ = std::fs::remove_dir_all(cassette.parent().unwrap());
}

#[test]
fn unknown_status_exits_with_message() {
    let cassette = write_cassette(
        "bad_status",
        vec![
            ok(json!([{"taskId": "t-1", "title": "Write docs", "skills": []}])),
            ok(json!([{"statusId": 1, "statusName": "Open"}])),
        ],
    );

    let output = run_taskboard(&["set-status", "t-1", "99"], Some(&cassette));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Selected status is not available."));

    let _ = std::fs::remove_dir_all(cassette.parent().unwrap());
}

#[test]
fn statuses_table_from_replay() {
    let cassette = write_cassette("statuses", vec![ok(json!([{"statusId": 3, "statusName": "Blocked"}]))]);

    let output = run_taskboard(&["statuses"], Some(&cassette));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Blocked"));
    assert!(stdout.contains("1 statuses total."));

    let _ = std::fs::remove_dir_all(cassette.parent().unwrap());
}
