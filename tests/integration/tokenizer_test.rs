//! Integration tests for the argline tokenizer and the UTF-8 codec.

use argline::commands::{unescape, ArglineCursor, Remainder, TokenCursor};
use argline::utf8;
use argline::CommandError;
use pretty_assertions::assert_eq;

#[test]
fn test_code_point_escapes_match_codec() {
    for code_point in [0x24u32, 0xA2, 0x20AC, 0xFFFF] {
        let line = format!(r"\u{code_point:04x}");
        let mut cursor = ArglineCursor::new(line);
        let bytes: Vec<u8> = cursor.parse().unwrap();
        assert_eq!(bytes, utf8::encode(code_point).unwrap());
        assert_eq!(utf8::decode(&bytes), Ok((code_point, bytes.len())));
    }
}

#[test]
fn test_codec_round_trip_full_range() {
    for code_point in (0..=utf8::MAX_CODE_POINT).step_by(97) {
        let bytes = utf8::encode(code_point).unwrap();
        assert_eq!(utf8::decode(&bytes), Ok((code_point, bytes.len())));
    }
}

#[test]
fn test_mixed_types_on_one_line() {
    let mut cursor = ArglineCursor::new(r#"  -12 255 "two words" off 1e3 rest of \"it\""#);
    assert_eq!(cursor.parse::<i8>(), Ok(-12));
    assert_eq!(cursor.parse::<u8>(), Ok(255));
    assert_eq!(cursor.parse::<String>(), Ok("two words".to_string()));
    assert_eq!(cursor.parse::<bool>(), Ok(false));
    assert_eq!(cursor.parse::<f32>(), Ok(1000.0));
    let rest: Remainder = cursor.parse().unwrap();
    assert_eq!(rest.as_str(), "rest of \"it\"");
    assert!(cursor.finish().is_ok());
}

#[test]
fn test_positions_never_regress_on_failure() {
    let mut cursor = ArglineCursor::new("7 oops 9");
    assert_eq!(cursor.parse::<u32>(), Ok(7));
    let raw = cursor.raw_position();

    assert!(matches!(
        cursor.parse::<u32>(),
        Err(CommandError::InvalidArgument { .. })
    ));
    assert!(cursor.raw_position() >= raw);
    assert_eq!(cursor.argument_position(), 1);

    assert_eq!(cursor.parse::<String>(), Ok("oops".to_string()));
    assert_eq!(cursor.parse::<u32>(), Ok(9));
}

#[test]
fn test_unescape_errors() {
    assert_eq!(unescape(br"tab\there"), Ok(b"tab\there".to_vec()));
    assert!(matches!(
        unescape(br"\x4"),
        Err(CommandError::InvalidEscapeFormat { position: 0 })
    ));
    assert!(matches!(
        unescape(b"end\\"),
        Err(CommandError::UnexpectedEscapeCharacter { position: 3 })
    ));
}
