//! The sequential argument extraction protocol shared by every argument source.
//!
//! A command body pulls its arguments one at a time through [`TokenCursor`]:
//!
//! ```
//! use argline::commands::{ArglineCursor, TokenCursor};
//!
//! let mut cursor = ArglineCursor::new("3 4");
//! let a: i32 = cursor.parse().unwrap();
//! let b: i32 = cursor.parse().unwrap();
//! cursor.finish().unwrap();
//! assert_eq!(a + b, 7);
//! ```
//!
//! Required arguments come back as a plain value or `NotEnoughArguments`;
//! optional arguments come back as `Some(value)` or `None` without advancing.

use crate::error::CommandError;

use super::placeholder::PlaceholderCursor;
use super::tokenizer::ArglineCursor;
use super::types::{ArgType, ArgValue};

/// Contract every argument source satisfies.
pub trait TokenCursor {
    /// Returns true when no further tokens remain.
    fn exhausted(&self) -> bool;

    /// Offset into the underlying source. Never decreases.
    fn raw_position(&self) -> usize;

    /// Number of arguments handed out so far.
    fn argument_position(&self) -> usize;

    /// Pulls the next value as `kind`.
    ///
    /// When nothing is left, fails with `NotEnoughArguments` if `required`
    /// and returns `Ok(None)` otherwise, without advancing.
    fn next_value(
        &mut self,
        kind: ArgType,
        required: bool,
    ) -> Result<Option<ArgValue>, CommandError>;

    /// Pulls the next value as the externally registered type `type_name`.
    fn next_custom(
        &mut self,
        type_name: &str,
        required: bool,
    ) -> Result<Option<String>, CommandError>;

    /// Asserts that every argument has been consumed.
    fn finish(&self) -> Result<(), CommandError> {
        if self.exhausted() {
            Ok(())
        } else {
            Err(CommandError::TooManyArguments)
        }
    }

    /// Pulls the next argument as `T`, with the required flag spelled out.
    fn parse_as<T: FromArgument>(&mut self, required: bool) -> Result<Option<T>, CommandError>
    where
        Self: Sized,
    {
        match self.next_value(T::KIND, required)? {
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| CommandError::invalid(T::KIND, "")),
            None => Ok(None),
        }
    }

    /// Pulls a required argument.
    fn parse<T: FromArgument>(&mut self) -> Result<T, CommandError>
    where
        Self: Sized,
    {
        self.parse_as(true)?
            .ok_or(CommandError::NotEnoughArguments)
    }

    /// Pulls an optional argument; `None` when the source is exhausted.
    fn parse_optional<T: FromArgument>(&mut self) -> Result<Option<T>, CommandError>
    where
        Self: Sized,
    {
        self.parse_as(false)
    }

    /// Pulls a custom-typed argument, normalized by its registered parser.
    fn parse_custom(
        &mut self,
        type_name: &str,
        required: bool,
    ) -> Result<Option<String>, CommandError> {
        self.next_custom(type_name, required)
    }
}

/// Rust types a cursor can produce, each bound to one [`ArgType`].
pub trait FromArgument: Sized {
    /// Tag requested from the cursor.
    const KIND: ArgType;

    /// Unwraps the matching [`ArgValue`] variant.
    fn from_value(value: ArgValue) -> Option<Self>;
}

/// The rest of the line, consumed as a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remainder(pub String);

impl Remainder {
    /// Returns the remainder text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper.
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn bytes_to_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

impl FromArgument for String {
    const KIND: ArgType = ArgType::Text;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Text(bytes) => Some(bytes_to_string(bytes)),
            _ => None,
        }
    }
}

impl FromArgument for Vec<u8> {
    const KIND: ArgType = ArgType::Text;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Text(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl FromArgument for Remainder {
    const KIND: ArgType = ArgType::Full;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Full(bytes) => Some(Remainder(bytes_to_string(bytes))),
            _ => None,
        }
    }
}

macro_rules! impl_from_argument {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromArgument for $ty {
                const KIND: ArgType = ArgType::$variant;

                fn from_value(value: ArgValue) -> Option<Self> {
                    match value {
                        ArgValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_argument! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
}

/// An argument source selected at construction.
#[derive(Debug)]
pub enum Cursor {
    /// Textual argument line.
    Argline(ArglineCursor),
    /// Pre-built typed queues.
    Placeholder(PlaceholderCursor),
}

impl From<ArglineCursor> for Cursor {
    fn from(cursor: ArglineCursor) -> Self {
        Self::Argline(cursor)
    }
}

impl From<PlaceholderCursor> for Cursor {
    fn from(cursor: PlaceholderCursor) -> Self {
        Self::Placeholder(cursor)
    }
}

impl TokenCursor for Cursor {
    fn exhausted(&self) -> bool {
        match self {
            Self::Argline(c) => c.exhausted(),
            Self::Placeholder(c) => c.exhausted(),
        }
    }

    fn raw_position(&self) -> usize {
        match self {
            Self::Argline(c) => c.raw_position(),
            Self::Placeholder(c) => c.raw_position(),
        }
    }

    fn argument_position(&self) -> usize {
        match self {
            Self::Argline(c) => c.argument_position(),
            Self::Placeholder(c) => c.argument_position(),
        }
    }

    fn next_value(
        &mut self,
        kind: ArgType,
        required: bool,
    ) -> Result<Option<ArgValue>, CommandError> {
        match self {
            Self::Argline(c) => c.next_value(kind, required),
            Self::Placeholder(c) => c.next_value(kind, required),
        }
    }

    fn next_custom(
        &mut self,
        type_name: &str,
        required: bool,
    ) -> Result<Option<String>, CommandError> {
        match self {
            Self::Argline(c) => c.next_custom(type_name, required),
            Self::Placeholder(c) => c.next_custom(type_name, required),
        }
    }
}
