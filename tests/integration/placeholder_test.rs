//! Integration tests driving commands through pre-built cursors.

use argline::commands::{
    register_demo, ArgType, ArgValue, ArglineCursor, BufferSink, CommandRegistry, Cursor,
    Invocation, PlaceholderCursor, TokenCursor,
};
use argline::CommandError;
use pretty_assertions::assert_eq;

fn demo_registry() -> CommandRegistry {
    let registry = CommandRegistry::new();
    assert!(register_demo(&registry));
    registry
}

#[test]
fn test_same_body_for_both_sources() {
    let registry = demo_registry();

    let mut text_sink = BufferSink::new();
    assert!(registry.dispatch_to("echo title body", &mut text_sink));

    let mut cursor = PlaceholderCursor::new();
    cursor.push_string("title");
    cursor.push_string("body");
    let mut placeholder_sink = BufferSink::new();
    assert!(registry.invoke("echo", cursor, &mut placeholder_sink));

    assert_eq!(text_sink.contents(), placeholder_sink.contents());
}

#[test]
fn test_placeholder_extra_values_rejected() {
    let registry = demo_registry();
    let cursor = PlaceholderCursor::from_values([
        ArgValue::I32(1),
        ArgValue::I32(2),
        ArgValue::I32(3),
    ]);
    let mut sink = BufferSink::new();
    assert!(!registry.invoke("sum", cursor, &mut sink));
    assert!(sink
        .contents()
        .starts_with("This command requires at most 2 arguments, but received more.\n"));
}

#[test]
fn test_invoke_unknown_command() {
    let registry = demo_registry();
    let mut sink = BufferSink::new();
    assert!(!registry.invoke("nope", PlaceholderCursor::new(), &mut sink));
    assert_eq!(sink.contents(), "Unknown command: nope\n");
}

#[test]
fn test_structured_invocation_round_trip() {
    let registry = demo_registry();
    let mut sink = BufferSink::new();
    let invocation =
        Invocation::from_json(r#"{"command":"sum","args":[{"i32":-5},{"i32":12}]}"#).unwrap();
    assert!(invocation.run(&registry, &mut sink));
    assert_eq!(sink.contents(), "Result: 7\n");
}

#[test]
fn test_cursor_variants_share_protocol() {
    let mut placeholder = PlaceholderCursor::new();
    placeholder.push_u16(8080);
    placeholder.push_bool(true);
    placeholder.push_f64(2.5);

    let cursors: [Cursor; 2] = [
        ArglineCursor::new("8080 on 2.5").into(),
        placeholder.into(),
    ];
    for mut cursor in cursors {
        assert_eq!(cursor.parse::<u16>(), Ok(8080));
        assert_eq!(cursor.parse::<bool>(), Ok(true));
        assert_eq!(cursor.parse::<f64>(), Ok(2.5));
        assert_eq!(cursor.argument_position(), 3);
        assert_eq!(cursor.parse_optional::<u16>(), Ok(None));
        assert_eq!(cursor.parse::<u16>(), Err(CommandError::NotEnoughArguments));
        assert!(cursor.finish().is_ok());
    }
}

#[test]
fn test_placeholder_order_mismatch_does_not_skip() {
    let mut cursor = PlaceholderCursor::new();
    cursor.push_string("first");
    cursor.push_u32(2);

    assert_eq!(cursor.parse_optional::<u32>(), Ok(None));
    assert_eq!(cursor.peek_type(), Some(ArgType::Text));
    assert_eq!(cursor.parse::<String>(), Ok("first".to_string()));
    assert_eq!(cursor.parse::<u32>(), Ok(2));
}
