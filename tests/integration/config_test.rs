//! Integration tests for loading configuration files.

use argline::commands::{register_builtins, register_demo, BufferSink, CommandRegistry};
use argline::config::Config;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from_file(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_and_apply() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[repl]
help_page_size = 2

[usage]
command_prefix = "!"
optarg_before = "{"
optarg_after = "}"

[aliases]
add = "sum"
"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    let registry = CommandRegistry::new();
    register_builtins(&registry, config.repl.help_page_size);
    register_demo(&registry);
    assert!(config.apply(&registry).is_empty());

    let mut sink = BufferSink::new();
    assert!(registry.dispatch_to("add 1 2", &mut sink));
    assert_eq!(sink.take(), "Result: 3\n");

    assert!(registry.dispatch_to("help", &mut sink));
    assert_eq!(
        sink.take(),
        "--- Help (page 1 of 2) ---\n\
         !echo (name <text>) (text <text>): Return the same text into the output.\n\
         !help {page <+int>}: Show commands, their usage and their description. \
         For showing information about a specific command, use /helpof command.\n\
         --- Next page: !help 2 ---\n"
    );
}

#[test]
fn test_invalid_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[repl]\nprompt = 5\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert_eq!(err.category(), "Configuration Error");
    assert!(err.to_string().contains("broken.toml"));
}
