//! End-to-end tests for interactive and structured sessions.

use super::common::{run_session, write_config};
use tempfile::tempdir;

#[test]
fn test_interactive_session() {
    let (code, stdout, _) = run_session(&[], "sum 3 4\nmsg hi \"there you\"\nquit\nsum 1 1\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Result: 7\n"));
    assert!(stdout.contains("Message [hi]: there you\n"));
    // Nothing after the quit word runs.
    assert!(!stdout.contains("Result: 2"));
}

#[test]
fn test_errors_do_not_end_session() {
    let (code, stdout, _) = run_session(&[], "bogus\nsum x 1\nsum 2 2\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Unknown command: bogus\n"));
    assert!(stdout.contains("Invalid value specified for argument \"number1\".\n"));
    assert!(stdout.contains("Result: 4\n"));
}

#[test]
fn test_prompt_override() {
    let (_, stdout, _) = run_session(&["--prompt", "argline> "], "quit\n");
    assert!(stdout.contains("argline> "));
}

#[test]
fn test_structured_session() {
    let input = concat!(
        r#"{"command":"sum","args":[{"i32":3},{"i32":4}]}"#,
        "\n",
        r#"{"command":"msg","args":[{"text":"t"},{"text":"raw text"}]}"#,
        "\n",
        "not json\n",
    );
    let (code, stdout, _) = run_session(&["--structured"], input);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Result: 7\n"));
    assert!(stdout.contains("Message [t]: raw text\n"));
    assert!(stdout.contains("Invocation error: malformed invocation"));
}

#[test]
fn test_config_file_applies() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "[repl]\nquit_word = \"bye\"\n\n[aliases]\nadd = \"sum\"\n",
    );
    let (code, stdout, _) = run_session(&["--config", &config], "add 5 5\nbye\nadd 1 1\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Result: 10\n"));
    assert!(!stdout.contains("Result: 2"));
}

#[test]
fn test_broken_config_exits_non_zero() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "[repl\n");
    let (code, _, stderr) = run_session(&["--config", &config], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration Error"));
}
