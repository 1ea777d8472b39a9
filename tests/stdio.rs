//! End-to-end tests driving the binary over stdin/stdout

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn requests(messages: &[Value]) -> String {
    messages
        .iter()
        .map(|m| format!("{}\n", m))
        .collect::<String>()
}

fn mathmcp(dir: &TempDir, config: &str) -> Command {
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, config).unwrap();

    let mut cmd = Command::cargo_bin("mathmcp").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config_path);
    cmd
}

#[test]
fn test_session_over_stdio() {
    let dir = TempDir::new().unwrap();
    let input = requests(&[
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {} }
        }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "add", "arguments": { "a": 15, "b": 27 } }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "get_random_fact", "arguments": {} }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "subtract", "arguments": { "a": 1, "b": 2 } }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "multiply", "arguments": { "a": 8, "b": 12 } }
        }),
    ]);

    let output = mathmcp(&dir, "[server]\nname = \"e2e-math\"\n")
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let responses: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("stdout must carry only JSON-RPC"))
        .collect();
    assert_eq!(responses.len(), 6);

    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "e2e-math");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 3);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "15 + 27 = 42"
    );
    assert!(responses[3]["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Math Fact: "));
    assert_eq!(responses[4]["id"], 5);
    assert_eq!(responses[4]["error"]["message"], "Unknown tool: subtract");
    assert_eq!(
        responses[5]["result"]["content"][0]["text"],
        "8 × 12 = 96"
    );
}

#[test]
fn test_startup_line_on_stderr() {
    let dir = TempDir::new().unwrap();
    mathmcp(&dir, "")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("mathmcp running on stdio"));
}

#[test]
fn test_startup_line_ignores_log_level() {
    let dir = TempDir::new().unwrap();
    mathmcp(&dir, "")
        .arg("--log-level")
        .arg("error")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("mathmcp running on stdio"));
}

#[test]
fn test_startup_line_with_log_file() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("mathmcp.log");
    mathmcp(&dir, "")
        .arg("--log-file")
        .arg(&log_path)
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("mathmcp running on stdio"));
    assert!(log_path.exists());
}

#[test]
fn test_quiet_stderr_after_startup() {
    let dir = TempDir::new().unwrap();
    let input = requests(&[json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": "subtract", "arguments": {} }
    })]);

    let output = mathmcp(&dir, "").write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.lines().count(), 1, "unexpected stderr: {}", stderr);
}

#[test]
fn test_missing_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("mathmcp")
        .unwrap()
        .current_dir(dir.path())
        .arg("--config")
        .arg(dir.path().join("does-not-exist.toml"))
        .write_stdin("")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    mathmcp(&dir, "[logging\nlevel = ")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}
