//! End-to-end CLI tests for chatdemux.
//!
//! These tests run the actual binary against export fixtures written to a
//! temporary directory and check its output.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Creates a conversation folder split over two part files, plus a stray
/// folder holding an unexpected file.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    let chat = dir.path().join("hikers");
    fs::create_dir(&chat).unwrap();
    fs::create_dir(chat.join("photos")).unwrap();

    // Newest history lives in message_1.json, newest first within each file.
    let newest = r#"{
  "participants": [{"name": "Ann"}, {"name": "Bob"}],
  "messages": [
    {"sender_name": "Ann", "timestamp_ms": 1705314780000, "content": "The call ended.", "type": "Call", "call_duration": 120},
    {"sender_name": "Bob", "timestamp_ms": 1705314720000, "content": "Bob joined the call.", "type": "Generic"},
    {"sender_name": "Ann", "timestamp_ms": 1705314660000, "content": "Ann started a call.", "type": "Generic"}
  ]
}"#;
    let oldest = r#"{
  "participants": [{"name": "Ann"}, {"name": "Bob"}],
  "messages": [
    {"sender_name": "Bob", "timestamp_ms": 1705314630000, "content": "Bob set the nickname for Ann to Annie.", "type": "Generic"},
    {"sender_name": "Ann", "timestamp_ms": 1705314600000, "content": "ChÃ¢teau tonight?", "type": "Generic"}
  ]
}"#;
    fs::write(chat.join("message_1.json"), newest).unwrap();
    fs::write(chat.join("message_2.json"), oldest).unwrap();

    let stray = dir.path().join("stray");
    fs::create_dir(&stray).unwrap();
    fs::write(stray.join("message_1.json"), newest).unwrap();
    fs::write(stray.join("readme.txt"), "not an export").unwrap();

    dir
}

fn chatdemux_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_chatdemux"));
    Command::from_std(cmd)
}

fn chat_folder(dir: &TempDir) -> PathBuf {
    dir.path().join("hikers")
}

// ============================================================================
// Output Formats
// ============================================================================

mod output_formats {
    use super::*;

    #[test]
    fn test_summary_is_default() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .args([chat_folder(&fixtures).to_str().unwrap(), "--owner", "Ann"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Messages: 5"))
            .stdout(predicate::str::contains("Ann (owner), Bob"))
            .stdout(predicate::str::contains("call_start: 1"))
            .stdout(predicate::str::contains("nickname_change: 1"));
    }

    #[test]
    fn test_jsonl_to_stdout() {
        let fixtures = setup_fixtures();

        let output = chatdemux_cmd()
            .args([
                chat_folder(&fixtures).to_str().unwrap(),
                "--owner",
                "Ann",
                "--format",
                "jsonl",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let types: Vec<String> = stdout
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            types,
            ["text", "nickname_change", "call_start", "call_join", "call_end"]
        );
    }

    #[test]
    fn test_json_to_file() {
        let fixtures = setup_fixtures();
        let output = fixtures.path().join("out.json");

        chatdemux_cmd()
            .args([
                chat_folder(&fixtures).to_str().unwrap(),
                "--owner",
                "Ann",
                "-f",
                "json",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stderr(predicate::str::contains("Wrote 5 messages"));

        let content = fs::read_to_string(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        let messages = parsed.as_array().unwrap();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0]["content"], "Château tonight?");
        assert_eq!(messages[1]["new_nickname"], "Annie");
        assert_eq!(messages[1]["subject"], "Ann");
    }

    #[test]
    fn test_csv_to_stdout() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .args([
                chat_folder(&fixtures).to_str().unwrap(),
                "--owner",
                "Ann",
                "--format",
                "csv",
            ])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Timestamp;Sender;Type;Content"))
            .stdout(predicate::str::contains("2024-01-15 10:31:00;Ann;call_start;Ann started a call."));
    }

    #[test]
    fn test_ndjson_alias() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .args([
                chat_folder(&fixtures).to_str().unwrap(),
                "--owner",
                "Ann",
                "--format",
                "ndjson",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"type\":\"call_end\""));
    }
}

// ============================================================================
// Flags
// ============================================================================

mod flags {
    use super::*;

    #[test]
    fn test_single_file_input() {
        let fixtures = setup_fixtures();
        let file = chat_folder(&fixtures).join("message_2.json");

        chatdemux_cmd()
            .args([file.to_str().unwrap(), "--owner", "Bob"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Messages: 2"))
            .stdout(predicate::str::contains("Bob (owner)"));
    }

    #[test]
    fn test_no_fix_encoding_keeps_raw_text() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .args([
                chat_folder(&fixtures).to_str().unwrap(),
                "--owner",
                "Ann",
                "--format",
                "jsonl",
                "--no-fix-encoding",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Château").not());
    }

    #[test]
    fn test_verbose_logs_to_stderr() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .env_remove("RUST_LOG")
            .args([chat_folder(&fixtures).to_str().unwrap(), "--owner", "Ann", "-v"])
            .assert()
            .success()
            .stderr(predicate::str::contains("classified export"));
    }

    #[test]
    fn test_progress_flag() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .args([
                chat_folder(&fixtures).to_str().unwrap(),
                "--owner",
                "Ann",
                "--progress",
            ])
            .assert()
            .success();
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_missing_owner() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .arg(chat_folder(&fixtures).to_str().unwrap())
            .assert()
            .failure()
            .stderr(predicate::str::contains("--owner"));
    }

    #[test]
    fn test_missing_input() {
        let fixtures = setup_fixtures();
        let missing = fixtures.path().join("nope.json");

        chatdemux_cmd()
            .args([missing.to_str().unwrap(), "--owner", "Ann"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Could not read json stream from file: nope.json"));
    }

    #[test]
    fn test_stray_file_in_folder() {
        let fixtures = setup_fixtures();
        let stray = fixtures.path().join("stray");

        chatdemux_cmd()
            .args([stray.to_str().unwrap(), "--owner", "Ann"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("readme.txt"));
    }

    #[test]
    fn test_unknown_format() {
        let fixtures = setup_fixtures();

        chatdemux_cmd()
            .args([
                chat_folder(&fixtures).to_str().unwrap(),
                "--owner",
                "Ann",
                "--format",
                "xml",
            ])
            .assert()
            .failure();
    }
}
