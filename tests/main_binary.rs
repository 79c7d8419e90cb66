//! Integration tests for the `gamble` binary (src/main.rs).
//!
//! These tests run the compiled binary through `Command` and check exit codes
//! and output. Disabled under Miri and WASI, which cannot spawn processes.
#![cfg(all(not(miri), not(target_os = "wasi")))]

use std::io::Write;
use std::process::Command;

/// Run the binary with the given args and return (stdout, stderr, exit_code).
fn run_binary(args: &[&str]) -> (String, String, i32) {
    let bin = env!("CARGO_BIN_EXE_gamble");
    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute binary");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

#[test]
fn no_args_exits_one() {
    let (_stdout, stderr, code) = run_binary(&[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Expected a path"), "stderr: {stderr}");
}

#[test]
fn missing_file_exits_two() {
    let (_stdout, stderr, code) = run_binary(&["nonexistent_file_12345.yaml"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Failed to read"), "stderr: {stderr}");
}

#[test]
fn valid_file_is_printed_normalized() {
    let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
    writeln!(tmp, "key: value\nlist: [a, null, 'null']").unwrap();
    let path = tmp.path().to_str().unwrap();

    let (stdout, stderr, code) = run_binary(&[path]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(
        stdout,
        "---\nkey: value\nlist:\n  - a\n  - null\n  - 'null'\n...\n"
    );
}

#[test]
fn invalid_file_exits_three() {
    let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
    // Mapping value not allowed here.
    writeln!(tmp, "a: b: c:").unwrap();
    let path = tmp.path().to_str().unwrap();

    let (_stdout, stderr, code) = run_binary(&[path]);
    assert_eq!(code, 3, "stderr: {stderr}");
    assert!(stderr.contains("invalid"), "stderr: {stderr}");
    assert!(stderr.contains("Error parsing YAML."), "stderr: {stderr}");
}
