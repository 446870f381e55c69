//! Tokenizer for command argument lines.
//!
//! [`ArglineCursor`] walks one immutable argument line and hands out typed
//! values on demand. It supports:
//! - Space separated bare tokens, where `\ ` keeps a space inside a token
//! - Single and double quoted tokens, ended by the next unescaped same quote
//! - C-style escapes: `\n`, `\t`, `\xHH`, `\uHHHH`, octal `\NNN` and friends
//! - A "full" argument that takes the rest of the line as one value
//!
//! Escape characters pair up: in `\\"` the quote is not escaped, in `\"` it is.

use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::CommandError;
use crate::utf8;

use super::cursor::TokenCursor;
use super::custom::TypeRegistry;
use super::types::{ArgType, ArgValue};

const SINGLE_QUOTE: u8 = b'\'';
const DOUBLE_QUOTE: u8 = b'"';
const ESCAPE: u8 = b'\\';
const SPACE: u8 = b' ';

/// Cursor over a textual argument line.
#[derive(Debug, Clone)]
pub struct ArglineCursor {
    line: String,
    pos: usize,
    argument_pos: usize,
    remainder_taken: bool,
    types: Option<Arc<TypeRegistry>>,
}

impl ArglineCursor {
    /// Creates a cursor at the start of `line`.
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            pos: 0,
            argument_pos: 0,
            remainder_taken: false,
            types: None,
        }
    }

    /// Attaches the custom types this cursor can parse.
    pub fn with_types(self, types: Arc<TypeRegistry>) -> Self {
        Self {
            types: Some(types),
            ..self
        }
    }

    /// Returns the whole argument line.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Returns the unconsumed part of the line.
    pub fn rest(&self) -> &str {
        self.line.get(self.pos..).unwrap_or("")
    }

    fn token_start(&self) -> usize {
        let bytes = self.line.as_bytes();
        let skipped = bytes[self.pos.min(bytes.len())..]
            .iter()
            .take_while(|&&b| b == SPACE)
            .count();
        self.pos + skipped
    }

    /// Moves to the next token. Returns false when none is left.
    fn begin(&mut self, required: bool) -> Result<bool, CommandError> {
        if self.remainder_taken {
            return Err(CommandError::ArgumentsAfterRemainder);
        }
        self.pos = self.token_start();
        if self.pos < self.line.len() {
            Ok(true)
        } else if required {
            Err(CommandError::NotEnoughArguments)
        } else {
            Ok(false)
        }
    }

    /// Extracts and unescapes the token at `pos`.
    ///
    /// Returns the decoded bytes and the offset just past the token; the
    /// caller commits that offset once the value is accepted.
    fn extract_token(&self) -> Result<(Vec<u8>, usize), CommandError> {
        let bytes = self.line.as_bytes();
        let start = self.pos;
        match bytes[start] {
            SINGLE_QUOTE | DOUBLE_QUOTE => {
                let end = find_closing_quote(bytes, start)?;
                let decoded = unescape_at(&bytes[start + 1..end], start + 1)?;
                Ok((decoded, end + 1))
            }
            _ => {
                let end = find_token_end(bytes, start)?;
                let decoded = unescape_at(&bytes[start..end], start)?;
                Ok((decoded, end))
            }
        }
    }

    fn take_remainder(&mut self) -> Result<ArgValue, CommandError> {
        let decoded = unescape_at(&self.line.as_bytes()[self.pos..], self.pos)?;
        self.pos = self.line.len();
        self.remainder_taken = true;
        self.argument_pos += 1;
        Ok(ArgValue::Full(decoded))
    }
}

impl TokenCursor for ArglineCursor {
    fn exhausted(&self) -> bool {
        self.remainder_taken || self.token_start() >= self.line.len()
    }

    fn raw_position(&self) -> usize {
        self.pos
    }

    fn argument_position(&self) -> usize {
        self.argument_pos
    }

    fn next_value(
        &mut self,
        kind: ArgType,
        required: bool,
    ) -> Result<Option<ArgValue>, CommandError> {
        if kind == ArgType::Custom {
            return Err(CommandError::UnknownCustomType(String::new()));
        }
        if !self.begin(required)? {
            return Ok(None);
        }
        if kind == ArgType::Full {
            return self.take_remainder().map(Some);
        }

        let (token, end) = self.extract_token()?;
        let value = convert(kind, token)?;
        self.pos = end;
        self.argument_pos += 1;
        Ok(Some(value))
    }

    fn next_custom(
        &mut self,
        type_name: &str,
        required: bool,
    ) -> Result<Option<String>, CommandError> {
        let parser = self
            .types
            .as_ref()
            .and_then(|types| types.get(type_name))
            .cloned()
            .ok_or_else(|| CommandError::UnknownCustomType(type_name.to_string()))?;
        if !self.begin(required)? {
            return Ok(None);
        }

        let (token, end) = self.extract_token()?;
        let text = String::from_utf8_lossy(&token);
        let value = parser(text.as_ref()).map_err(|reason| {
            tracing::debug!(type_name, %reason, "custom argument rejected");
            CommandError::invalid(ArgType::Custom, text.as_ref())
        })?;
        self.pos = end;
        self.argument_pos += 1;
        Ok(Some(value))
    }
}

/// Finds the quote closing the quoted token that starts at `start`.
fn find_closing_quote(bytes: &[u8], start: usize) -> Result<usize, CommandError> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            ESCAPE => i += 2,
            b if b == quote => return Ok(i),
            _ => i += 1,
        }
    }
    Err(CommandError::UnclosedQuote { position: start })
}

/// Finds the unescaped space ending the bare token at `start`, or the end of input.
fn find_token_end(bytes: &[u8], start: usize) -> Result<usize, CommandError> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            ESCAPE if i + 1 >= bytes.len() => {
                return Err(CommandError::UnexpectedEscapeCharacter { position: i })
            }
            ESCAPE => i += 2,
            SPACE => return Ok(i),
            _ => i += 1,
        }
    }
    Ok(bytes.len())
}

/// Expands every escape sequence in `input`.
///
/// Error positions are byte offsets into `input`.
pub fn unescape(input: &[u8]) -> Result<Vec<u8>, CommandError> {
    unescape_at(input, 0)
}

fn unescape_at(input: &[u8], offset: usize) -> Result<Vec<u8>, CommandError> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] != ESCAPE {
            out.push(input[i]);
            i += 1;
            continue;
        }
        if i + 1 >= input.len() {
            return Err(CommandError::UnexpectedEscapeCharacter {
                position: offset + i,
            });
        }
        let consumed = decode_escape(&input[i + 1..], &mut out).ok_or(
            CommandError::InvalidEscapeFormat {
                position: offset + i,
            },
        )?;
        i += 1 + consumed;
    }
    Ok(out)
}

/// Decodes one escape sequence; `seq` starts right after the backslash.
///
/// Returns the number of bytes consumed, or `None` when malformed.
fn decode_escape(seq: &[u8], out: &mut Vec<u8>) -> Option<usize> {
    let single = match seq[0] {
        b' ' | b'"' | b'\'' | b'?' | b'\\' => Some(seq[0]),
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'v' => Some(0x0B),
        _ => None,
    };
    if let Some(byte) = single {
        out.push(byte);
        return Some(1);
    }

    match seq[0] {
        // Any byte value, so the result may not be valid UTF-8.
        b'x' => {
            let value = parse_digits(seq.get(1..3)?, 16)?;
            out.push(value as u8);
            Some(3)
        }
        b'u' => {
            let value = parse_digits(seq.get(1..5)?, 16)?;
            out.extend(utf8::encode(value).ok()?);
            Some(5)
        }
        _ => {
            let value = parse_digits(seq.get(0..3)?, 8)?;
            out.push(u8::try_from(value).ok()?);
            Some(3)
        }
    }
}

fn parse_digits(digits: &[u8], radix: u32) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &b| {
        Some(acc * radix + char::from(b).to_digit(radix)?)
    })
}

fn convert(kind: ArgType, token: Vec<u8>) -> Result<ArgValue, CommandError> {
    if kind == ArgType::Text {
        return Ok(ArgValue::Text(token));
    }

    let text = match std::str::from_utf8(&token) {
        Ok(text) => text,
        Err(_) => {
            return Err(CommandError::invalid(
                kind,
                String::from_utf8_lossy(&token),
            ))
        }
    };

    let value = match kind {
        ArgType::I8 => ArgValue::I8(parse_integer(kind, text)?),
        ArgType::I16 => ArgValue::I16(parse_integer(kind, text)?),
        ArgType::I32 => ArgValue::I32(parse_integer(kind, text)?),
        ArgType::I64 => ArgValue::I64(parse_integer(kind, text)?),
        ArgType::U8 => ArgValue::U8(parse_integer(kind, text)?),
        ArgType::U16 => ArgValue::U16(parse_integer(kind, text)?),
        ArgType::U32 => ArgValue::U32(parse_integer(kind, text)?),
        ArgType::U64 => ArgValue::U64(parse_integer(kind, text)?),
        ArgType::F32 => ArgValue::F32(parse_float(kind, text, |v: f32| v.is_infinite())?),
        ArgType::F64 => ArgValue::F64(parse_float(kind, text, |v: f64| v.is_infinite())?),
        ArgType::Bool => ArgValue::Bool(parse_bool(text)?),
        ArgType::Text | ArgType::Full | ArgType::Custom => {
            unreachable!("{kind:?} is handled before token conversion")
        }
    };
    Ok(value)
}

/// Parses a decimal integer literal, telling malformed input from overflow.
fn parse_integer<T: TryFrom<i128>>(kind: ArgType, text: &str) -> Result<T, CommandError> {
    match text.parse::<i128>() {
        Ok(wide) => T::try_from(wide).map_err(|_| CommandError::out_of_range(kind, text)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Err(CommandError::out_of_range(kind, text))
            }
            _ => Err(CommandError::invalid(kind, text)),
        },
    }
}

/// Parses a float literal, rejecting values that overflow to infinity or
/// underflow to zero.
fn parse_float<T: FromStr + Copy + Default + PartialEq>(
    kind: ArgType,
    text: &str,
    is_infinite: impl Fn(T) -> bool,
) -> Result<T, CommandError> {
    let value: T = text
        .parse()
        .map_err(|_| CommandError::invalid(kind, text))?;
    if is_infinite(value) && !is_infinity_literal(text) {
        return Err(CommandError::out_of_range(kind, text));
    }
    if value == T::default() && has_nonzero_mantissa(text) {
        return Err(CommandError::out_of_range(kind, text));
    }
    Ok(value)
}

fn has_nonzero_mantissa(text: &str) -> bool {
    text.split(['e', 'E'])
        .next()
        .is_some_and(|mantissa| mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')))
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn parse_bool(text: &str) -> Result<bool, CommandError> {
    match text.to_ascii_lowercase().as_str() {
        "yes" | "on" | "true" | "y" | "t" => Ok(true),
        "no" | "off" | "false" | "n" | "f" => Ok(false),
        _ => Err(CommandError::invalid(ArgType::Bool, text)),
    }
}
