//! Common test utilities for running the binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs `argline` with `args`, feeding `input` on stdin.
///
/// Returns the exit code, stdout and stderr. A config path that does not
/// exist is passed unless `args` names one, so the user's own config never
/// leaks into a test.
pub fn run_session(args: &[&str], input: &str) -> (i32, String, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_argline"));
    if !args.contains(&"--config") {
        command.args(["--config", "/nonexistent/argline/config.toml"]);
    }
    let mut child = command
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start argline");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for argline");
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Writes `content` to `config.toml` inside `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> String {
    let path = dir.join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    path.to_string_lossy().into_owned()
}
