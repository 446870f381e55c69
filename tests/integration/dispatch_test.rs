//! Integration tests for line dispatch through the command registry.

use argline::commands::{
    register_builtins, register_demo, ArgDef, ArgType, BufferSink, Command, CommandDef,
    CommandRegistry, ExecutionContext, Remainder, TokenCursor, DEFAULT_HELP_PAGE_SIZE,
};
use argline::CommandError;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn demo_registry() -> CommandRegistry {
    let registry = CommandRegistry::new();
    assert!(register_builtins(&registry, DEFAULT_HELP_PAGE_SIZE));
    assert!(register_demo(&registry));
    registry
}

fn dispatch(registry: &CommandRegistry, line: &str) -> (bool, String) {
    let mut sink = BufferSink::new();
    let ok = registry.dispatch_to(line, &mut sink);
    (ok, sink.contents())
}

/// Sends a short message to a recipient.
struct Tell;

const TELL_ARGS: &[ArgDef] = &[
    ArgDef::new(ArgType::Text, "to", "Recipient"),
    ArgDef::new(ArgType::Full, "message", "Message text"),
];

impl Command for Tell {
    fn name(&self) -> &str {
        "tell"
    }

    fn description(&self) -> &str {
        "Send a message."
    }

    fn args(&self) -> &[ArgDef] {
        TELL_ARGS
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), CommandError> {
        let to: String = ctx.cursor().parse()?;
        let message: Remainder = ctx.cursor().parse()?;
        ctx.write_str(&format!("{to} <- {}\n", message.as_str()));
        Ok(())
    }
}

#[test]
fn test_sum_scenario() {
    let registry = demo_registry();
    assert_eq!(dispatch(&registry, "sum 3 4"), (true, "Result: 7\n".to_string()));
}

#[test]
fn test_echo_quoting_scenarios() {
    let registry = demo_registry();
    assert_eq!(
        dispatch(&registry, r#"echo title "hello world""#),
        (true, "Message [title]: hello world\n".to_string())
    );
    assert_eq!(
        dispatch(&registry, r"echo a\ b c"),
        (true, "Message [a b]: c\n".to_string())
    );
    assert_eq!(
        dispatch(&registry, r#"msg 'it\'s' "say \"hi\"""#),
        (true, "Message [it's]: say \"hi\"\n".to_string())
    );
}

#[test]
fn test_helpof_unknown_command_is_reported() {
    let registry = demo_registry();
    assert_eq!(
        dispatch(&registry, "helpof nosuchcmd"),
        (false, "Command \"nosuchcmd\" not found.\n".to_string())
    );
    // The registry keeps working afterwards.
    assert!(dispatch(&registry, "helpof sum").0);
}

#[test]
fn test_bad_escape_names_argument() {
    let registry = demo_registry();
    let (ok, out) = dispatch(&registry, r"echo x\q y");
    assert!(!ok);
    assert!(out.starts_with("Invalid escape code sequence specified for argument \"name\":"));

    let (ok, out) = dispatch(&registry, r"echo x y\q");
    assert!(!ok);
    assert!(out.starts_with("Invalid escape code sequence specified for argument \"text\":"));
}

#[test]
fn test_register_twice_fails() {
    let registry = demo_registry();
    let before = registry.command_count();
    assert!(!registry.register(Arc::new(CommandDef::new("sum", "Other", |_| Ok(())))));
    assert_eq!(registry.command_count(), before);
    assert_eq!(
        registry.lookup("sum").map(|c| c.description().to_string()),
        Some("Count the sum of two integers.".to_string())
    );
}

#[test]
fn test_full_argument_takes_rest_of_line() {
    let registry = CommandRegistry::new();
    assert!(registry.register(Arc::new(Tell)));
    assert_eq!(
        dispatch(&registry, r"tell bob  see you at \x31\x30"),
        (true, "bob <- see you at 10\n".to_string())
    );
    let (ok, out) = dispatch(&registry, "tell bob");
    assert!(!ok);
    assert!(out.starts_with("This command requires at least 2 arguments, but received 1.\n"));
}

#[test]
fn test_unicode_escapes_reach_command() {
    let registry = demo_registry();
    assert_eq!(
        dispatch(&registry, r"echo \u00e9t\u00e9 \u20ac"),
        (true, "Message [été]: €\n".to_string())
    );
}

#[test]
fn test_alias_removal_by_identity() {
    let registry = demo_registry();
    assert!(registry.add_alias("say", "msg"));
    let echo = registry.lookup("echo").unwrap();
    assert_eq!(registry.aliases_of(&echo), vec!["echo", "msg", "say"]);

    assert!(registry.unregister("say", true));
    assert!(registry.lookup("echo").is_none());
    assert!(registry.lookup("msg").is_none());
    assert!(!dispatch(&registry, "msg a b").0);

    // The removed command stays alive for holders of a reference.
    assert_eq!(echo.name(), "echo");
}

#[test]
fn test_concurrent_dispatch() {
    let registry = Arc::new(demo_registry());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || dispatch(&registry, &format!("sum {i} {i}")))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), (true, format!("Result: {}\n", i * 2)));
    }
}

#[test]
fn test_dispatch_runs_one_body_at_a_time() {
    let registry = Arc::new(demo_registry());
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));

    let (current, max, count) = (
        Arc::clone(&in_flight),
        Arc::clone(&max_in_flight),
        Arc::clone(&runs),
    );
    assert!(registry.register(Arc::new(CommandDef::new(
        "slow",
        "Hold the registry briefly.",
        move |ctx: &mut ExecutionContext<'_>| {
            let now = current.fetch_add(1, Ordering::SeqCst) + 1;
            max.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            count.fetch_add(1, Ordering::SeqCst);
            current.fetch_sub(1, Ordering::SeqCst);
            ctx.cursor().finish()
        },
    ))));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || dispatch(&registry, "slow"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (true, String::new()));
    }

    assert_eq!(runs.load(Ordering::SeqCst), 8);
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
}

#[test]
fn test_commands_inspect_registry() {
    let registry = demo_registry();
    assert!(registry.register(Arc::new(CommandDef::new(
        "count",
        "Count commands.",
        |ctx: &mut ExecutionContext<'_>| {
            ctx.cursor().finish()?;
            let count = ctx.registry().command_count();
            ctx.write_str(&format!("{count}\n"));
            Ok(())
        },
    ))));
    assert_eq!(dispatch(&registry, "count"), (true, "5\n".to_string()));
}
